//! Integration tests for MCP protocol handling.
//!
//! These tests drive the server loop end to end over in-memory buffers:
//! one JSON-RPC message per input line, one reply per request line.

use std::path::Path;

use serde_json::{json, Value};
use tempfile::TempDir;

use unmess_design_mcp::artifacts::{ArtifactLayout, Artifacts};
use unmess_design_mcp::mcp::protocol::{parse_message, IncomingMessage, RequestId};
use unmess_design_mcp::mcp::{LineTransport, McpServer};

// =============================================================================
// Helpers
// =============================================================================

fn design_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let specs = dir.path().join("component-specs");
    let tokens = dir.path().join("src/tokens");
    std::fs::create_dir_all(&specs).unwrap();
    std::fs::create_dir_all(&tokens).unwrap();
    std::fs::write(
        specs.join("Button.md"),
        "# Button\n\nClickable action trigger.\n",
    )
    .unwrap();
    std::fs::write(
        tokens.join("colors.json"),
        r##"{"primary":{"$value":"#4DA3FF"}}"##,
    )
    .unwrap();
    dir
}

async fn run_session(root: &Path, lines: &[Value]) -> Vec<Value> {
    let mut input = String::new();
    for line in lines {
        input.push_str(&line.to_string());
        input.push('\n');
    }

    let mut server = McpServer::new(Artifacts::new(&ArtifactLayout::from_root(root)));
    let mut transport = LineTransport::new(input.as_bytes(), Vec::new());
    server.serve(&mut transport).await.unwrap();

    String::from_utf8(transport.into_writer())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn initialize(id: i64) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "test-client", "version": "1.0.0"}
        }
    })
}

fn call(id: i64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

fn text_of(reply: &Value) -> Value {
    let text = reply["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

// =============================================================================
// Protocol Parsing Tests
// =============================================================================

#[test]
fn test_parse_initialize_request() {
    let msg = parse_message(&initialize(1).to_string()).unwrap();
    let IncomingMessage::Request(req) = msg else {
        panic!("Expected Request");
    };
    assert_eq!(req.method, "initialize");
    assert_eq!(req.id, RequestId::Number(1));
}

#[test]
fn test_parse_notification() {
    let msg = parse_message(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#)
        .unwrap();
    assert!(matches!(msg, IncomingMessage::Notification(_)));
}

#[test]
fn test_parse_missing_jsonrpc_version() {
    assert!(parse_message(r#"{"id": 1, "method": "test"}"#).is_err());
}

// =============================================================================
// Session Tests
// =============================================================================

#[tokio::test]
async fn test_full_session() {
    let root = design_root();
    let replies = run_session(
        root.path(),
        &[
            initialize(1),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            call(3, "list_components", json!({})),
            json!({"jsonrpc": "2.0", "id": 4, "method": "ping"}),
        ],
    )
    .await;

    // The notification produces no line.
    assert_eq!(replies.len(), 4);

    assert_eq!(replies[0]["id"], 1);
    assert_eq!(replies[0]["result"]["serverInfo"]["name"], "unmessme-mcp-server");
    assert_eq!(
        replies[0]["result"]["serverInfo"]["version"],
        env!("CARGO_PKG_VERSION")
    );

    let tools = replies[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 12);
    assert_eq!(tools[0]["name"], "benchmark_formats");
    assert_eq!(tools[0]["inputSchema"]["type"], "object");

    let listing = text_of(&replies[2]);
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["components"][0]["name"], "Button");
    assert_eq!(
        listing["components"][0]["description"],
        "Clickable action trigger."
    );

    assert_eq!(replies[3], json!({"jsonrpc": "2.0", "id": 4, "result": {}}));
}

#[tokio::test]
async fn test_tools_usable_without_initialized_notification() {
    let root = design_root();
    let replies = run_session(
        root.path(),
        &[initialize(1), call(2, "get_tokens", json!({"category": "colors"}))],
    )
    .await;

    assert_eq!(
        text_of(&replies[1]),
        json!({"category": "colors", "tokens": {"primary": "#4DA3FF"}})
    );
}

#[tokio::test]
async fn test_calls_before_initialize_are_rejected() {
    let root = design_root();
    let replies = run_session(root.path(), &[call(1, "list_components", json!({}))]).await;

    assert_eq!(replies[0]["error"]["code"], -32600);
    assert_eq!(replies[0]["error"]["message"], "Server not initialised");
}

#[tokio::test]
async fn test_protocol_errors() {
    let root = design_root();
    let mut server = McpServer::new(Artifacts::new(&ArtifactLayout::from_root(root.path())));
    let input = "{broken\n\n{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"resources/list\"}\n";
    let mut transport = LineTransport::new(input.as_bytes(), Vec::new());
    server.serve(&mut transport).await.unwrap();

    let output = String::from_utf8(transport.into_writer()).unwrap();
    let replies: Vec<Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    // Blank lines are skipped.
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["error"]["code"], -32700);
    assert!(replies[0]["id"].is_null());
    assert_eq!(replies[1]["error"]["code"], -32601);
    assert_eq!(replies[1]["id"], 9);
}

#[tokio::test]
async fn test_invalid_arguments_envelope() {
    let root = design_root();
    let replies = run_session(
        root.path(),
        &[
            initialize(1),
            call(2, "get_component", json!({"component_name": "../secrets"})),
            call(3, "search_components", json!({"query": 42, "extra": true})),
        ],
    )
    .await;

    assert_eq!(replies[1]["result"]["isError"], true);
    let traversal = text_of(&replies[1]);
    assert_eq!(traversal["kind"], "InvalidArguments");
    assert_eq!(traversal["violations"][0]["field"], "component_name");

    let envelope = text_of(&replies[2]);
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["tool"], "search_components");
    let fields: Vec<&str> = envelope["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["extra", "query"]);
}
