//! Errors raised while dispatching a tool call.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::schema::FieldViolation;
use crate::artifacts::ArtifactError;

/// Classification carried by every error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToolErrorKind {
    /// No tool is registered under the requested name.
    ToolNotFound,
    /// The arguments did not match the tool's schema.
    InvalidArguments,
    /// A required artifact was missing and the handler did not recover.
    ArtifactNotFound,
    /// The handler failed.
    ToolExecutionError,
}

impl ToolErrorKind {
    /// The kind's wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToolNotFound => "ToolNotFound",
            Self::InvalidArguments => "InvalidArguments",
            Self::ArtifactNotFound => "ArtifactNotFound",
            Self::ToolExecutionError => "ToolExecutionError",
        }
    }
}

impl fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Unknown tool name.
    #[error("Unknown tool: {name}")]
    NotFound {
        /// The requested name.
        name: String,
    },

    /// Schema validation failed.
    #[error("Invalid arguments: {}", summarise(.0))]
    InvalidArguments(Vec<FieldViolation>),

    /// An artifact the handler needed does not exist.
    #[error("{0}")]
    ArtifactNotFound(String),

    /// The handler failed.
    #[error("{0}")]
    Execution(String),
}

impl ToolError {
    /// The envelope kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ToolErrorKind {
        match self {
            Self::NotFound { .. } => ToolErrorKind::ToolNotFound,
            Self::InvalidArguments(_) => ToolErrorKind::InvalidArguments,
            Self::ArtifactNotFound(_) => ToolErrorKind::ArtifactNotFound,
            Self::Execution(_) => ToolErrorKind::ToolExecutionError,
        }
    }
}

impl From<ArtifactError> for ToolError {
    fn from(err: ArtifactError) -> Self {
        if err.is_not_found() {
            Self::ArtifactNotFound(err.to_string())
        } else {
            Self::Execution(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Execution(err.to_string())
    }
}

fn summarise(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}
