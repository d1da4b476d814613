//! Error types for the transform pipelines.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for pipeline runs.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum TransformError {
    /// An input directory does not exist.
    #[error("input directory not found: {path}")]
    InputMissing {
        /// The missing directory.
        path: PathBuf,
    },

    /// The file enumeration pattern could not be built.
    #[error("invalid file pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: glob::PatternError,
    },

    /// An input file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An output file or directory could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A token file is not valid JSON.
    #[error("failed to parse JSON in {path}: {source}")]
    Json {
        /// Path to the file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}
