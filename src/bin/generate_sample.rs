use std::fs::File;
use std::io::{BufWriter, Write};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // 50 channels -> two overview batches at the default batch size of 40
    let channel_count = 50;
    let xs: Vec<f64> = (0..=200).map(|i| i as f64 * 0.5).collect();

    // One gaussian bump per channel, centre and width derived from the index
    let peaks: Vec<(f64, f64, f64)> = (0..channel_count)
        .map(|c| {
            let mu = 10.0 + (c as f64) * 1.6;
            let sigma = 4.0 + (c % 7) as f64;
            let amp = 0.5 + (c % 5) as f64 * 0.4;
            (mu, sigma, amp)
        })
        .collect();

    let output_path = "data.csv";
    let file = File::create(output_path).expect("Failed to create output file");
    let mut out = BufWriter::new(file);

    let header: Vec<String> = std::iter::once("x".to_string())
        .chain((0..channel_count).map(|c| format!("ch_{c:02}")))
        .collect();
    writeln!(out, "{}", header.join(",")).expect("Failed to write header");

    for &x in &xs {
        write!(out, "{x}").expect("Failed to write row");
        for (mu, sigma, amp) in &peaks {
            // roughly one cell in 200 left blank to exercise sparse handling
            if rng.next_f64() < 0.005 {
                write!(out, ",").expect("Failed to write cell");
            } else {
                let value = gaussian(x, *mu, *sigma, *amp) + rng.gauss(0.0, 0.01);
                write!(out, ",{value:.5}").expect("Failed to write cell");
            }
        }
        writeln!(out).expect("Failed to write row");
    }

    println!(
        "Wrote {} rows x {} channels to {output_path}",
        xs.len(),
        channel_count
    );
}
