//! Tool registry and dispatcher.
//!
//! Every tool is declared once, in [`ToolRegistry::builtin`], with its name,
//! description, input schema and handler. `tools/list` is a projection of
//! that table and `tools/call` goes through [`ToolRegistry::call`], which
//! always produces a [`ToolCallResult`]:
//!
//! 1. unknown names become a `ToolNotFound` envelope
//! 2. arguments are validated against the schema before the handler runs
//! 3. handler failures become a `ToolExecutionError` envelope
//! 4. successful values are rendered as text (strings verbatim, everything
//!    else as indented JSON)

mod benchmark;
mod chunks;
mod codegen;
mod components;
mod error;
pub mod schema;
mod tokens;
mod validate;

pub use error::{ToolError, ToolErrorKind};
pub use schema::{Arguments, Field, FieldViolation, InputSchema};

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

use crate::artifacts::Artifacts;
use crate::codec::pretty;

/// The future returned by a tool handler.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, ToolError>> + 'a>>;

/// A tool handler: validated arguments in, JSON value out.
pub type Handler = for<'a> fn(&'a Artifacts, Arguments) -> HandlerFuture<'a>;

/// A registry entry.
#[derive(Clone)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: &'static str,
    /// Human-readable description, surfaced verbatim.
    pub description: &'static str,
    /// Declared arguments.
    pub schema: InputSchema,
    /// The implementation.
    pub handler: Handler,
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Unique tool name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON Schema of the arguments.
    pub input_schema: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call: exactly one of success or error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
    /// Error classification; set exactly when `is_error` is.
    #[serde(skip)]
    pub error_kind: Option<ToolErrorKind>,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if passes &T
const fn is_false(b: &bool) -> bool {
    !*b
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
            error_kind: None,
        }
    }

    /// Creates the error envelope for a failed call to `tool`.
    #[must_use]
    pub fn error(tool: &str, err: &ToolError) -> Self {
        let message = match err {
            ToolError::Execution(_) => format!("Error executing tool {tool}: {err}"),
            _ => err.to_string(),
        };

        let mut body = json!({
            "status": "error",
            "kind": err.kind(),
            "tool": tool,
            "message": message,
        });
        if let ToolError::InvalidArguments(violations) = err {
            body["violations"] = json!(violations);
        }

        Self {
            content: vec![ToolContent::Text {
                text: pretty(&body),
            }],
            is_error: true,
            error_kind: Some(err.kind()),
        }
    }

    /// The text of the first content block.
    #[must_use]
    pub fn first_text(&self) -> &str {
        match self.content.first() {
            Some(ToolContent::Text { text }) => text.as_str(),
            None => "",
        }
    }
}

/// The ordered, immutable set of tools.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: IndexMap<&'static str, ToolDefinition>,
}

impl ToolRegistry {
    /// Builds a registry from definitions, keeping declaration order.
    ///
    /// A repeated name keeps the first definition.
    #[must_use]
    pub fn from_definitions(definitions: Vec<ToolDefinition>) -> Self {
        let mut tools = IndexMap::with_capacity(definitions.len());
        for definition in definitions {
            if tools.contains_key(definition.name) {
                tracing::warn!(tool = definition.name, "Duplicate tool definition ignored");
                continue;
            }
            tools.insert(definition.name, definition);
        }
        Self { tools }
    }

    /// The design-system tool set.
    #[must_use]
    pub fn builtin() -> Self {
        let mut definitions = Vec::new();
        // Benchmarks
        definitions.extend(benchmark::definitions());
        definitions.extend(chunks::definitions());
        // Component discovery
        definitions.extend(components::definitions());
        // Design tokens
        definitions.extend(tokens::definitions());
        // Code generation
        definitions.extend(codegen::definitions());
        // Validation
        definitions.extend(validate::definitions());
        Self::from_definitions(definitions)
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Projects the registry for `tools/list`, in declaration order.
    #[must_use]
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|tool| ToolDescriptor {
                name: tool.name,
                description: tool.description,
                input_schema: tool.schema.to_json_schema(),
            })
            .collect()
    }

    /// Validates and runs a tool call. Never fails: every outcome is an
    /// envelope.
    pub async fn call(&self, artifacts: &Artifacts, name: &str, arguments: &Value) -> ToolCallResult {
        match self.dispatch(artifacts, name, arguments).await {
            Ok(Value::String(text)) => ToolCallResult::text(text),
            Ok(value) => ToolCallResult::text(pretty(&value)),
            Err(err) => {
                tracing::warn!(tool = name, kind = %err.kind(), error = %err, "Tool call failed");
                ToolCallResult::error(name, &err)
            }
        }
    }

    async fn dispatch(
        &self,
        artifacts: &Artifacts,
        name: &str,
        arguments: &Value,
    ) -> Result<Value, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::NotFound {
            name: name.to_string(),
        })?;
        let args = tool
            .schema
            .validate(arguments)
            .map_err(ToolError::InvalidArguments)?;

        tracing::debug!(tool = name, "Dispatching tool call");
        (tool.handler)(artifacts, args).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
