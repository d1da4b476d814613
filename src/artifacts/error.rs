//! Error types for artifact lookups.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// The kind of artifact a lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A component spec markdown file.
    Component,
    /// A design-token JSON file.
    TokenCategory,
    /// A blueprint markdown file.
    Blueprint,
    /// A materialised benchmark corpus file.
    CorpusFile,
}

impl ArtifactKind {
    /// Label used when the artifact's directory is missing.
    #[must_use]
    pub const fn directory_label(self) -> &'static str {
        match self {
            Self::Component => "Component specs",
            Self::TokenCategory => "Tokens",
            Self::Blueprint => "Blueprints",
            Self::CorpusFile => "Corpus",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Component => "Component",
            Self::TokenCategory => "Token category",
            Self::Blueprint => "Blueprint",
            Self::CorpusFile => "Corpus file",
        })
    }
}

/// Errors that can occur while reading artifacts.
///
/// `NotFound` and `DirectoryMissing` are expected conditions that tool
/// handlers turn into structured replies. The remaining variants are genuine
/// failures.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The named artifact does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// What was being looked up.
        kind: ArtifactKind,
        /// The requested name.
        name: String,
        /// Where it was expected.
        path: PathBuf,
    },

    /// The directory holding this kind of artifact does not exist.
    #[error("{} directory not found", kind.directory_label())]
    DirectoryMissing {
        /// What the directory should contain.
        kind: ArtifactKind,
        /// The expected directory.
        path: PathBuf,
    },

    /// A file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path being read.
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

impl ArtifactError {
    /// Returns `true` for the recoverable "not found" family.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::DirectoryMissing { .. })
    }
}
