//! Model Context Protocol (MCP) server.
//!
//! Exposes the design-system tools to AI assistants over newline-delimited
//! JSON-RPC 2.0 on stdio.
//!
//! ```text
//! ┌───────────────┐    ┌───────────────┐    ┌───────────────┐
//! │   Transport   │───▶│    Server     │───▶│ ToolRegistry  │
//! │ (stdin/stdout)│    │  (lifecycle)  │    │  (dispatch)   │
//! └───────────────┘    └───────────────┘    └───────┬───────┘
//!                                                   ▼
//!                                           ┌───────────────┐
//!                                           │   Artifacts   │
//!                                           └───────────────┘
//! ```
//!
//! Targets MCP protocol version 2024-11-05.

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use transport::{LineTransport, StdioTransport};
