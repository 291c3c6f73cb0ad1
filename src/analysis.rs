use std::fmt;

use crate::data::model::DataTable;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// DeltaSummary – scalar result of a point comparison
// ---------------------------------------------------------------------------

/// Values of the two compared parameters at the selected row, plus their
/// difference. `x` is the X the caller asked about, not the selected row's X.
///
/// Fields hold full precision; the 3-decimal rounding is display-only.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaSummary {
    pub x: f64,
    pub param1: String,
    pub param2: String,
    pub value1: f64,
    pub value2: f64,
    pub delta: f64,
}

impl fmt::Display for DeltaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "At X = {}:", self.x)?;
        writeln!(f, "{}: {:.3}", self.param1, self.value1)?;
        writeln!(f, "{}: {:.3}", self.param2, self.value2)?;
        write!(f, "Delta: {:.3}", self.delta)
    }
}

// ---------------------------------------------------------------------------
// DeltaAnalyzer – point-wise comparison of two named parameters
// ---------------------------------------------------------------------------

/// Read-only comparison of two parameters over a loaded table.
///
/// Both parameters must have a value in every row; a single gap fails the
/// whole analysis with [`Error::MissingParameter`] rather than silently
/// skipping rows.
pub struct DeltaAnalyzer<'a> {
    table: &'a DataTable,
    param1: String,
    param2: String,
}

impl<'a> DeltaAnalyzer<'a> {
    pub fn new(table: &'a DataTable, param1: impl Into<String>, param2: impl Into<String>) -> Self {
        DeltaAnalyzer {
            table,
            param1: param1.into(),
            param2: param2.into(),
        }
    }

    fn row_values(&self, row: usize) -> Result<(f64, f64)> {
        let point = &self.table.points()[row];
        let lookup = |name: &str| {
            point.values.get(name).copied().ok_or_else(|| Error::MissingParameter {
                name: name.to_string(),
                row,
                x: point.x,
            })
        };
        Ok((lookup(&self.param1)?, lookup(&self.param2)?))
    }

    /// Per-row `param2 - param1` across the whole table, in row order.
    pub fn delta_series(&self) -> Result<Vec<f64>> {
        (0..self.table.len())
            .map(|row| self.row_values(row).map(|(v1, v2)| v2 - v1))
            .collect()
    }

    /// Index of the first row whose X is at or above `x` (lower-bound search).
    ///
    /// Precondition, inherited from the source data and not verified here:
    /// rows ascend by X. A query above the table's maximum X fails with
    /// [`Error::OutOfRange`].
    pub fn find_nearest(&self, x: f64) -> Result<usize> {
        let points = self.table.points();
        let idx = points.partition_point(|p| p.x < x);
        if idx == points.len() {
            return Err(Error::OutOfRange {
                requested: x,
                max: self.table.max_x().unwrap_or(f64::NAN),
            });
        }
        Ok(idx)
    }

    /// Compare the two parameters at the row selected by [`find_nearest`].
    pub fn summarize(&self, x: f64) -> Result<DeltaSummary> {
        let row = self.find_nearest(x)?;
        let (value1, value2) = self.row_values(row)?;
        Ok(DeltaSummary {
            x,
            param1: self.param1.clone(),
            param2: self.param2.clone(),
            value1,
            value2,
            delta: value2 - value1,
        })
    }
}

// ---------------------------------------------------------------------------
// Axis range helper
// ---------------------------------------------------------------------------

/// Y-axis range for a delta plot: the series extent padded by 10 % on each
/// side. A constant series would collapse to a zero-width range, which is a
/// degenerate chart input, so that case widens to one unit on each side.
pub fn padded_range(series: &[f64]) -> (f64, f64) {
    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() || min == max {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.1;
    (min - pad, max + pad)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;

    fn table(csv: &str) -> DataTable {
        load_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn delta_series_is_p2_minus_p1() {
        let t = table("t,p1,p2\n0,1,4\n1,2,2\n");
        let analyzer = DeltaAnalyzer::new(&t, "p1", "p2");
        assert_eq!(analyzer.delta_series().unwrap(), vec![3.0, 0.0]);
    }

    #[test]
    fn missing_parameter_fails_and_names_it() {
        let t = table("t,a,b\n0,1,2\n1,3,huh\n");
        let analyzer = DeltaAnalyzer::new(&t, "a", "b");
        match analyzer.delta_series() {
            Err(Error::MissingParameter { name, row, .. }) => {
                assert_eq!(name, "b");
                assert_eq!(row, 1);
            }
            other => panic!("expected MissingParameter, got {other:?}"),
        }
        // summarize at the offending row fails the same way
        assert!(matches!(
            analyzer.summarize(1.0),
            Err(Error::MissingParameter { .. })
        ));
    }

    #[test]
    fn find_nearest_is_lower_bound() {
        let t = table("t,a\n0,1\n1,1\n2,1\n3,1\n");
        let analyzer = DeltaAnalyzer::new(&t, "a", "a");
        assert_eq!(analyzer.find_nearest(1.5).unwrap(), 2);
        assert_eq!(analyzer.find_nearest(2.0).unwrap(), 2);
        assert_eq!(analyzer.find_nearest(-1.0).unwrap(), 0);
        match analyzer.find_nearest(5.0) {
            Err(Error::OutOfRange { requested, max }) => {
                assert_eq!(requested, 5.0);
                assert_eq!(max, 3.0);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn summarize_reports_requested_x_and_selected_row_values() {
        let t = table("t,p1,p2\n0,1,4\n2,2,7\n");
        let analyzer = DeltaAnalyzer::new(&t, "p1", "p2");
        let summary = analyzer.summarize(1.5).unwrap();
        assert_eq!(summary.x, 1.5);
        assert_eq!(summary.value1, 2.0);
        assert_eq!(summary.value2, 7.0);
        assert_eq!(summary.delta, 5.0);
    }

    #[test]
    fn summary_display_rounds_to_three_decimals() {
        let summary = DeltaSummary {
            x: 1.5,
            param1: "p1".into(),
            param2: "p2".into(),
            value1: 1.23456,
            value2: 2.0,
            delta: 0.76544,
        };
        let text = summary.to_string();
        assert!(text.starts_with("At X = 1.5:\n"));
        assert!(text.contains("p1: 1.235"));
        assert!(text.ends_with("Delta: 0.765"));
    }

    #[test]
    fn padded_range_adds_ten_percent_each_side() {
        let (lo, hi) = padded_range(&[3.0, 0.0]);
        assert!((lo - -0.3).abs() < 1e-12);
        assert!((hi - 3.3).abs() < 1e-12);
    }

    #[test]
    fn padded_range_guards_constant_series() {
        assert_eq!(padded_range(&[2.0, 2.0, 2.0]), (1.0, 3.0));
    }
}
