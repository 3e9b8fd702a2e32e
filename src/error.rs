use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a run. Everything else (missing attributes, truncated
/// elements, unparseable timestamps) is tolerated and shows up in the report.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("file {} does not exist", .0.display())]
    InputMissing(PathBuf),

    #[error("opening input file {}: {source}", .path.display())]
    OpenInput { path: PathBuf, source: io::Error },

    #[error("creating output file {}: {source}", .path.display())]
    CreateOutput { path: PathBuf, source: io::Error },

    #[error("reading input: {0}")]
    Read(#[source] io::Error),

    #[error("writing output: {0}")]
    Write(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;
