//! Startup error types: configuration and transport selection.
//!
//! Errors raised while serving requests live next to the code that raises
//! them (`artifacts`, `transform`, `tools`).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors selecting a transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP/SSE transport was requested but is not available in this build.
    #[error("TransportUnavailable: HTTP/SSE transport on port {port} is not supported; run without --port to use stdio")]
    Unavailable {
        /// The requested port.
        port: u16,
    },
}
