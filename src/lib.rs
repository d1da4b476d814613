//! unmess-design-mcp: MCP tool server for the UnmessMe design system
//!
//! Gives AI assistants structured access to component documentation, design
//! tokens and code generation helpers, plus a benchmark of how compactly the
//! same material can be encoded for a model's context window.
//!
//! # Modules
//!
//! - [`artifacts`]: read-only repositories over specs, tokens, blueprints and corpora
//! - [`codec`]: document encodings (`raw_md`, `toon_md`, `json_md`, `json`)
//! - [`config`]: configuration loading and validation
//! - [`error`]: startup error types
//! - [`mcp`]: MCP protocol implementation
//! - [`tools`]: tool registry, argument validation and handlers
//! - [`transform`]: batch pipelines that materialise the benchmark corpora

pub mod artifacts;
pub mod codec;
pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;
pub mod transform;
