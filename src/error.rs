//! Error types for this crate.
use std::path::PathBuf;

use thiserror::Error;

use crate::Stage;

/// Any kind of error in the pipeline load -> preprocess -> merge -> format -> write.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot open '{}'", path.display())]
    FileNotAccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{}' is not a valid CSV table", path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("'{}' line {line}: expected at most {expected} fields, found {found}", path.display())]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("missing column '{column}' during {stage}")]
    MissingColumn { column: String, stage: Stage },
    #[error("cannot convert '{value}' in column '{column}' (row {row}) to an integer")]
    TypeConversion {
        column: String,
        value: String,
        row: usize,
    },
    #[error("cannot write '{}'", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// A value that cannot be read as an [crate::Mxuid].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("'{0}' is not a number")]
pub struct ParseMxuidError(pub String);
