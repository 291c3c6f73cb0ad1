use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::warn;

use super::model::{DataPoint, DataTable};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a data table from a CSV file on disk.
pub fn load_path(path: &Path) -> Result<DataTable> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_reader(file)
}

/// Parse a CSV stream into a [`DataTable`].
///
/// Layout: the header's first field labels the X column (the label itself is
/// discarded, the position is what matters); the remaining fields become the
/// parameter names, in order. Each data line is split into cells aligned to
/// the header columns:
///
/// * column 0 must parse as an `f64` X value — otherwise the whole row is
///   skipped with a warning,
/// * any other cell that fails to parse simply leaves that parameter absent
///   from the row's value map; the row itself is kept,
/// * short rows are fine, cells beyond the header width are ignored.
///
/// Duplicate header names are kept as distinct column slots; within a row the
/// later column overwrites the earlier one's map entry.
pub fn load_reader<R: Read>(reader: R) -> Result<DataTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let parameter_names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let width = headers.len();

    let mut points = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;

        let x = match record.get(0).and_then(|cell| cell.parse::<f64>().ok()) {
            Some(x) => x,
            None => {
                // header is line 1, first record is line 2
                warn!("line {}: X cell is not numeric, skipping row", idx + 2);
                continue;
            }
        };

        let mut values = BTreeMap::new();
        for (slot, cell) in record.iter().take(width).skip(1).enumerate() {
            if let Ok(v) = cell.parse::<f64>() {
                values.insert(parameter_names[slot].clone(), v);
            }
        }
        points.push(DataPoint { x, values });
    }

    if points.is_empty() {
        return Err(Error::EmptyDataset);
    }
    Ok(DataTable::new(points, parameter_names))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn load(csv: &str) -> Result<DataTable> {
        load_reader(csv.as_bytes())
    }

    #[test]
    fn header_order_round_trip() {
        let table = load("time,alpha,beta,gamma\n0,1,2,3\n1,4,5,6\n").unwrap();
        assert_eq!(table.parameter_names(), ["alpha", "beta", "gamma"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn non_numeric_cell_leaves_parameter_absent() {
        let table = load("t,a,b,c\n0,1,oops,3\n").unwrap();
        let row = &table.points()[0];
        assert_eq!(row.values.get("a"), Some(&1.0));
        assert_eq!(row.values.get("b"), None);
        assert_eq!(row.values.get("c"), Some(&3.0));
    }

    #[test]
    fn empty_cell_leaves_parameter_absent() {
        let table = load("t,a,b\n0,,2\n").unwrap();
        let row = &table.points()[0];
        assert!(!row.values.contains_key("a"));
        assert_eq!(row.values.get("b"), Some(&2.0));
    }

    #[test]
    fn bad_x_skips_whole_row() {
        let table = load("t,a\n0,1\nnot-a-number,2\n2,3\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.points()[0].x, 0.0);
        assert_eq!(table.points()[1].x, 2.0);
        // the surviving rows keep their own values, nothing shifts
        assert_eq!(table.points()[1].values.get("a"), Some(&3.0));
    }

    #[test]
    fn short_rows_keep_parsed_prefix() {
        let table = load("t,a,b\n0,1\n1,2,3\n").unwrap();
        assert_eq!(table.points()[0].values.get("a"), Some(&1.0));
        assert!(!table.points()[0].values.contains_key("b"));
        assert_eq!(table.points()[1].values.get("b"), Some(&3.0));
    }

    #[test]
    fn cells_beyond_header_width_are_ignored() {
        let table = load("t,a\n0,1,99,98\n").unwrap();
        let row = &table.points()[0];
        assert_eq!(row.values.len(), 1);
        assert_eq!(row.values.get("a"), Some(&1.0));
    }

    #[test]
    fn duplicate_header_later_column_wins() {
        let table = load("t,a,a\n0,1,2\n").unwrap();
        assert_eq!(table.parameter_names(), ["a", "a"]);
        assert_eq!(table.points()[0].values.get("a"), Some(&2.0));
    }

    #[test]
    fn zero_usable_rows_is_an_error() {
        assert!(matches!(load("t,a\n"), Err(Error::EmptyDataset)));
        assert!(matches!(load("t,a\nx,1\ny,2\n"), Err(Error::EmptyDataset)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_path(Path::new("/no/such/file.csv")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
