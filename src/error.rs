use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or querying the rating datasets.
///
/// Everything here is fatal for the load step: the joined table is built once
/// and never patched up afterwards.
#[derive(Error, Debug)]
pub enum DataError {
    /// One of the two input files does not exist.
    #[error("{kind} file not found: {}", .path.display())]
    MissingFile { kind: &'static str, path: PathBuf },

    /// A required column is absent, or a required value cannot be parsed.
    #[error("{}: {reason}", .path.display())]
    DataShape { path: PathBuf, reason: String },

    #[error("reading {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A column name that `top_n_by_column` cannot rank by.
    #[error("unknown numeric column '{0}'")]
    UnknownColumn(String),
}

impl DataError {
    pub fn shape(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DataError::DataShape {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means an input file is absent.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, DataError::MissingFile { .. })
    }
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
