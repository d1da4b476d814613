//! Design token tools.

use serde::Deserialize;
use serde_json::json;

use super::{Arguments, Field, HandlerFuture, InputSchema, ToolDefinition, ToolError};
use crate::artifacts::{ArtifactError, Artifacts, TokenCategory, TokenSelection};

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_tokens",
            description: "Get design tokens (colors, spacing, typography, radius, shadows)",
            schema: InputSchema::new(vec![
                Field::string("category", "Token category to retrieve")
                    .one_of(&TokenSelection::NAMES),
                Field::boolean(
                    "resolve",
                    "Collapse token objects to their values and substitute {path} references",
                )
                .optional()
                .with_default(true),
            ]),
            handler: get_tokens,
        },
        ToolDefinition {
            name: "search_tokens",
            description: "Search for design tokens by name or value (e.g., 'primary', 'blue', '16px')",
            schema: InputSchema::new(vec![Field::string(
                "query",
                "Search query (token name or value)",
            )
            .min_length(1)]),
            handler: search_tokens,
        },
    ]
}

#[derive(Deserialize)]
struct GetParams {
    category: String,
    #[serde(default = "default_resolve")]
    resolve: bool,
}

const fn default_resolve() -> bool {
    true
}

#[derive(Deserialize)]
struct SearchParams {
    query: String,
}

fn get_tokens(artifacts: &Artifacts, args: Arguments) -> HandlerFuture<'_> {
    Box::pin(async move {
        let GetParams { category, resolve } = args.parse()?;
        let selection: TokenSelection = category.parse().map_err(ToolError::Execution)?;

        match artifacts.tokens.get(selection, resolve).await {
            Ok(tokens) => Ok(json!({
                "category": selection.as_str(),
                "tokens": tokens,
            })),
            Err(e @ ArtifactError::DirectoryMissing { .. }) => Ok(json!({
                "error": e.to_string(),
            })),
            Err(e @ ArtifactError::NotFound { .. }) => {
                let available: Vec<&str> = TokenCategory::ALL.iter().map(|c| c.as_str()).collect();
                Ok(json!({
                    "error": e.to_string(),
                    "available": available,
                }))
            }
            Err(e) => Err(e.into()),
        }
    })
}

fn search_tokens(artifacts: &Artifacts, args: Arguments) -> HandlerFuture<'_> {
    Box::pin(async move {
        let SearchParams { query } = args.parse()?;
        match artifacts.tokens.search(&query).await {
            Ok(search) => Ok(serde_json::to_value(search)?),
            Err(e @ ArtifactError::DirectoryMissing { .. }) => Ok(json!({
                "error": e.to_string(),
                "results": [],
            })),
            Err(e) => Err(e.into()),
        }
    })
}
