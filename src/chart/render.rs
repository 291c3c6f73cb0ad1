use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use log::{debug, info};

use crate::error::{Error, Result};

use super::spec::PlotSpec;

// ---------------------------------------------------------------------------
// Render – the external renderer capability
// ---------------------------------------------------------------------------

/// Capability to turn a [`PlotSpec`] into an image. Injected at the call
/// sites that emit charts, so the derivation logic never depends on a
/// particular backend or process-spawning mechanism.
pub trait Render {
    fn render(&self, spec: &PlotSpec) -> Result<()>;
}

// ---------------------------------------------------------------------------
// GnuplotRenderer – blocking gnuplot child process
// ---------------------------------------------------------------------------

/// Renders by materializing the spec as co-located artifacts in `out_dir`
/// (`<name>.txt` data table, `<name>.gp` script, `<name>.json` spec) and
/// running `gnuplot <name>.gp` there, which produces `<name>.png`.
pub struct GnuplotRenderer {
    out_dir: PathBuf,
}

impl GnuplotRenderer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        GnuplotRenderer {
            out_dir: out_dir.into(),
        }
    }

    /// Write the data, script and JSON artifacts without invoking gnuplot.
    /// Returns the script path.
    pub fn write_artifacts(&self, spec: &PlotSpec) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir).map_err(|source| Error::Io {
            path: self.out_dir.clone(),
            source,
        })?;

        let write = |path: PathBuf, contents: String| -> Result<PathBuf> {
            fs::write(&path, contents).map_err(|source| Error::Io { path: path.clone(), source })?;
            Ok(path)
        };

        write(
            self.out_dir.join(format!("{}.txt", spec.name)),
            data_file_contents(spec),
        )?;
        let json = serde_json::to_string_pretty(spec).map_err(|e| Error::Render {
            chart: spec.name.clone(),
            reason: format!("spec serialization failed: {e}"),
        })?;
        write(self.out_dir.join(format!("{}.json", spec.name)), json)?;
        let script = write(
            self.out_dir.join(format!("{}.gp", spec.name)),
            script_contents(spec),
        )?;
        debug!("wrote chart artifacts for '{}'", spec.name);
        Ok(script)
    }
}

impl Render for GnuplotRenderer {
    fn render(&self, spec: &PlotSpec) -> Result<()> {
        self.write_artifacts(spec)?;

        // Artifact paths inside the script are relative, so run gnuplot from
        // the output directory.
        let status = Command::new("gnuplot")
            .arg(format!("{}.gp", spec.name))
            .current_dir(&self.out_dir)
            .status()
            .map_err(|e| Error::Render {
                chart: spec.name.clone(),
                reason: format!("failed to launch gnuplot: {e}"),
            })?;
        if !status.success() {
            return Err(Error::Render {
                chart: spec.name.clone(),
                reason: format!("gnuplot exited with {status}"),
            });
        }
        info!(
            "rendered {}",
            self.out_dir.join(format!("{}.png", spec.name)).display()
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Artifact generation (pure, testable without gnuplot installed)
// ---------------------------------------------------------------------------

/// Whitespace-separated data table. Absent values come through as `NaN` and
/// are written as `nan`, which gnuplot draws as a gap.
pub fn data_file_contents(spec: &PlotSpec) -> String {
    let mut out = String::new();
    if let Some(comment) = &spec.comment {
        let _ = writeln!(out, "# {comment}");
    }
    for row in &spec.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|v| {
                if v.is_nan() {
                    "nan".to_string()
                } else {
                    v.to_string()
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" "));
    }
    out
}

/// gnuplot script for the spec: png terminal at the requested size, one
/// multiplot panel per [`super::spec::Panel`], markers fed as inline `'-'`
/// data blocks.
pub fn script_contents(spec: &PlotSpec) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "set terminal png size {},{}", spec.width, spec.height);
    let _ = writeln!(s, "set output '{}.png'", spec.name);
    if spec.panels.len() > 1 {
        let _ = writeln!(s, "set multiplot layout {},1", spec.panels.len());
    }
    let _ = writeln!(s, "set grid");

    for panel in &spec.panels {
        s.push('\n');
        let _ = writeln!(s, "set title '{}'", panel.title);
        let _ = writeln!(s, "set xlabel '{}'", panel.x_label);
        let _ = writeln!(s, "set ylabel '{}'", panel.y_label);
        if let Some((lo, hi)) = panel.y_range {
            let _ = writeln!(s, "set yrange [{lo}:{hi}]");
        }
        if panel.key_outside {
            let _ = writeln!(s, "set key outside right");
        } else {
            let _ = writeln!(s, "set key right");
        }

        let mut elements: Vec<String> = panel
            .series
            .iter()
            .map(|series| {
                format!(
                    "'{}.txt' using 1:{} title '{}' with lines",
                    spec.name,
                    series.column + 1,
                    series.label
                )
            })
            .collect();
        for marker in &panel.markers {
            let title = match &marker.label {
                Some(label) => format!("title '{label}'"),
                None => "notitle".to_string(),
            };
            elements.push(format!("'-' {title} with points pt 7 ps 2"));
        }
        let _ = writeln!(s, "plot {}", elements.join(", \\\n     "));
        for marker in &panel.markers {
            let _ = writeln!(s, "{} {}", marker.x, marker.y);
            let _ = writeln!(s, "e");
        }
    }

    if spec.panels.len() > 1 {
        let _ = writeln!(s, "unset multiplot");
    }
    s
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
