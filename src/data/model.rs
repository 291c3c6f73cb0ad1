use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// DataPoint – one row of the table
// ---------------------------------------------------------------------------

/// A single record: the independent variable X plus a sparse set of named
/// parameter values. A parameter whose cell was empty or non-numeric in the
/// source row is simply absent from `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub x: f64,
    /// parameter name → value for this row.
    pub values: BTreeMap<String, f64>,
}

// ---------------------------------------------------------------------------
// DataTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset: rows in source order plus the ordered parameter
/// list taken from the CSV header (column 0, the X column, excluded).
///
/// Rows are appended in source order and never re-sorted; downstream lookups
/// assume X ascends across the source. Only the loader constructs a
/// `DataTable`, and nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct DataTable {
    points: Vec<DataPoint>,
    parameter_names: Vec<String>,
}

impl DataTable {
    pub(crate) fn new(points: Vec<DataPoint>, parameter_names: Vec<String>) -> Self {
        DataTable {
            points,
            parameter_names,
        }
    }

    /// Parameter names in header order. The union of keys any row may carry;
    /// a given row is not guaranteed to hold a value for each of them.
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// Rows in source order (read-only).
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest X in the table. Rows ascend by X, so this is the last row's X.
    pub fn max_x(&self) -> Option<f64> {
        self.points.last().map(|p| p.x)
    }
}
