mod analysis;
mod chart;
mod data;
mod error;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use log::{error, info};

use crate::analysis::{padded_range, DeltaAnalyzer};
use crate::chart::batch::{ChartBatcher, DEFAULT_BATCH_SIZE};
use crate::chart::render::{GnuplotRenderer, Render};
use crate::data::model::DataTable;

fn main() -> ExitCode {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data.csv"));

    info!("reading CSV file {}", path.display());
    let table = match data::loader::load_path(&path) {
        Ok(table) => table,
        Err(e) => {
            error!("loading {} failed: {e}", path.display());
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    println!("Loaded {} rows from {}", table.len(), path.display());

    println!("Available parameters:");
    for name in table.parameter_names() {
        println!("  {name}");
    }

    match prompt_yes_no("\nWould you like to compare parameters? (y/n): ") {
        Ok(true) => {
            let renderer = GnuplotRenderer::new(".");
            if let Err(e) = compare_parameters(&table, &renderer) {
                eprintln!("Error comparing parameters: {e:#}");
            }
        }
        Ok(false) => {}
        Err(e) => eprintln!("Error: {e:#}"),
    }

    println!("\nGenerating overview graphs...");
    generate_overviews(&table, &GnuplotRenderer::new("plots"));
    println!("Done.");

    ExitCode::SUCCESS
}

/// Prompt for an X point and two parameter names, print the comparison
/// summary and render the two-panel delta chart into the working directory.
fn compare_parameters(table: &DataTable, renderer: &dyn Render) -> Result<()> {
    let x = prompt_x()?;
    let param1 = prompt_parameter(table.parameter_names(), "Enter first parameter name: ")?;
    let param2 = prompt_parameter(table.parameter_names(), "Enter second parameter name: ")?;

    let analyzer = DeltaAnalyzer::new(table, param1, param2);
    let deltas = analyzer.delta_series()?;
    let summary = analyzer.summarize(x)?;
    println!("{summary}");

    let spec = ChartBatcher::new(table).delta_spec(&summary, &deltas, padded_range(&deltas));
    renderer
        .render(&spec)
        .context("rendering delta comparison chart")?;
    Ok(())
}

/// Render one overview chart per parameter batch. A failed chart is reported
/// and the remaining batches still render.
fn generate_overviews(table: &DataTable, renderer: &dyn Render) {
    let batcher = ChartBatcher::new(table);
    let total = batcher.batch_count(DEFAULT_BATCH_SIZE);
    info!("generating {total} overview charts");
    for (index, batch) in batcher.batches(DEFAULT_BATCH_SIZE).enumerate() {
        let spec = batcher.overview_spec(&batch, index, total);
        if let Err(e) = renderer.render(&spec) {
            error!("{e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt helpers
// ---------------------------------------------------------------------------

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("flushing stdout")?;
    let mut line = String::new();
    let n = io::stdin()
        .read_line(&mut line)
        .context("reading from stdin")?;
    if n == 0 {
        bail!("stdin closed");
    }
    Ok(line.trim().to_string())
}

fn prompt_yes_no(prompt: &str) -> Result<bool> {
    let answer = prompt_line(prompt)?;
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn prompt_x() -> Result<f64> {
    loop {
        let line = prompt_line("Enter X-axis point for comparison: ")?;
        match line.parse() {
            Ok(x) => return Ok(x),
            Err(_) => println!("Not a number, try again."),
        }
    }
}

fn prompt_parameter(valid: &[String], prompt: &str) -> Result<String> {
    loop {
        let name = prompt_line(prompt)?;
        if valid.contains(&name) {
            return Ok(name);
        }
        println!("Invalid parameter. Please choose from the list above.");
    }
}
