use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between a CSV source and a rendered chart.
///
/// Each variant carries the context an operator needs to correct the input and
/// re-run: the offending path, parameter name, or requested X. None of these
/// are retried automatically.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV input")]
    Csv(#[from] csv::Error),

    #[error("no usable data rows in input")]
    EmptyDataset,

    #[error("parameter '{name}' has no value in row {row} (x = {x})")]
    MissingParameter { name: String, row: usize, x: f64 },

    #[error("x = {requested} is beyond the data range (max x = {max})")]
    OutOfRange { requested: f64, max: f64 },

    #[error("renderer failed for chart '{chart}': {reason}")]
    Render { chart: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
