//! Component discovery tools.

use serde::Deserialize;
use serde_json::{json, Value};

use super::{Arguments, Field, HandlerFuture, InputSchema, ToolDefinition, ToolError};
use crate::artifacts::{ArtifactError, Artifacts};

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_component",
            description: "Get complete documentation for a component including props, \
                          usage examples, and design tokens",
            schema: InputSchema::new(vec![Field::string(
                "component_name",
                "The name of the component (e.g., 'Button', 'Card')",
            )
            .file_name()]),
            handler: get_component,
        },
        ToolDefinition {
            name: "list_components",
            description: "List all available components in the design system with brief descriptions",
            schema: InputSchema::empty(),
            handler: list_components,
        },
        ToolDefinition {
            name: "search_components",
            description: "Search for components by purpose, feature, or keyword \
                          (e.g., 'form', 'navigation', 'button')",
            schema: InputSchema::new(vec![Field::string(
                "query",
                "Search query (e.g., 'form validation', 'navigation')",
            )
            .min_length(1)]),
            handler: search_components,
        },
    ]
}

#[derive(Deserialize)]
struct GetParams {
    component_name: String,
}

#[derive(Deserialize)]
struct SearchParams {
    query: String,
}

fn get_component(artifacts: &Artifacts, args: Arguments) -> HandlerFuture<'_> {
    Box::pin(async move {
        let GetParams { component_name } = args.parse()?;

        let spec = match artifacts.specs.get(&component_name).await {
            Ok(spec) => spec,
            Err(e) if e.is_not_found() => {
                return Ok(json!({
                    "error": e.to_string(),
                    "suggestion": "Try using list_components to see all available components",
                }));
            }
            Err(e) => return Err(ToolError::from(e)),
        };

        let mut reply = json!({
            "component": spec.name,
            "documentation": spec.content,
        });
        if let Some(metadata) = spec.metadata {
            reply["metadata"] = Value::Object(metadata);
        }
        reply["message"] = json!(format!("Retrieved documentation for {component_name}"));
        Ok(reply)
    })
}

fn list_components(artifacts: &Artifacts, _args: Arguments) -> HandlerFuture<'_> {
    Box::pin(async move {
        match artifacts.specs.list().await {
            Ok(components) => Ok(json!({
                "total": components.len(),
                "components": components,
            })),
            Err(e @ ArtifactError::DirectoryMissing { .. }) => Ok(json!({
                "error": e.to_string(),
                "components": [],
            })),
            Err(e) => Err(e.into()),
        }
    })
}

fn search_components(artifacts: &Artifacts, args: Arguments) -> HandlerFuture<'_> {
    Box::pin(async move {
        let SearchParams { query } = args.parse()?;
        match artifacts.specs.search(&query).await {
            Ok(search) => Ok(serde_json::to_value(search)?),
            Err(e @ ArtifactError::DirectoryMissing { .. }) => Ok(json!({
                "error": e.to_string(),
                "results": [],
            })),
            Err(e) => Err(e.into()),
        }
    })
}
