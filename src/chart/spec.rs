use serde::Serialize;

// ---------------------------------------------------------------------------
// PlotSpec – declarative description of one chart
// ---------------------------------------------------------------------------

/// A complete chart description: the data table to plot plus one or more
/// panels describing how to draw it. Handed to a [`crate::chart::render`]
/// backend; also serialized to JSON next to the rendered image.
#[derive(Debug, Clone, Serialize)]
pub struct PlotSpec {
    /// Logical artifact stem; the renderer derives `<name>.txt`, `<name>.gp`,
    /// `<name>.json` and `<name>.png` from it.
    pub name: String,
    /// Output image size in pixels.
    pub width: u32,
    pub height: u32,
    /// Optional leading `#` comment line for the data artifact.
    pub comment: Option<String>,
    /// Column labels; column 0 is X.
    pub columns: Vec<String>,
    /// Row-major data, aligned to `columns`. Absent values are `NaN`, which
    /// the renderer writes as `nan` (a gap, for gnuplot).
    pub rows: Vec<Vec<f64>>,
    pub panels: Vec<Panel>,
}

/// One panel of a (possibly multiplot) chart.
#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Explicit y-axis clamp, e.g. the padded delta range.
    pub y_range: Option<(f64, f64)>,
    pub series: Vec<Series>,
    pub markers: Vec<Marker>,
    /// Legend outside the plot area (overview charts) or inside (delta).
    pub key_outside: bool,
}

/// One line series: a data column plotted against X.
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    /// Index into [`PlotSpec::columns`]; never 0 (that is the X column).
    pub column: usize,
    pub label: String,
}

/// A single highlighted point.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    /// `None` suppresses the legend entry.
    pub label: Option<String>,
}
