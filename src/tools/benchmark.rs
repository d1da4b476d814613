//! `benchmark_formats`: size comparison of the four codecs on a blueprint.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{Arguments, Field, HandlerFuture, InputSchema, ToolDefinition, ToolError};
use crate::artifacts::Artifacts;
use crate::codec::{self, Document, EncodedSize, OutputFormat};

const BASELINE: OutputFormat = OutputFormat::JsonMd;

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition {
        name: "benchmark_formats",
        description: "Compare token efficiency of Raw MD, Toon+MD, JSON+MD, and Pure JSON.",
        schema: InputSchema::new(vec![Field::string(
            "blueprint_name",
            "The name of the blueprint file to test (e.g., 'unmess_me_ui_blueprint.md')",
        )
        .file_name()]),
        handler: benchmark_formats,
    }]
}

#[derive(Deserialize)]
struct Params {
    blueprint_name: String,
}

fn benchmark_formats(artifacts: &Artifacts, args: Arguments) -> HandlerFuture<'_> {
    Box::pin(async move {
        let Params { blueprint_name } = args.parse()?;

        let content = match artifacts.blueprints.load(&blueprint_name).await {
            Ok(content) => content,
            Err(e) if e.is_not_found() => {
                let available = artifacts.blueprints.list().await?;
                return Ok(json!({
                    "error": e.to_string(),
                    "suggestion": "Check the blueprint file name, including the .md extension",
                    "available": available,
                }));
            }
            Err(e) => return Err(ToolError::from(e)),
        };

        let document = Document::new(blueprint_metadata(&blueprint_name), content);
        let results = compare(&document);
        tracing::debug!(blueprint = %blueprint_name, "Benchmarked blueprint encodings");

        Ok(json!({
            "blueprint": blueprint_name,
            "analysis": "Benchmark: Comparing against Standard JSON+MD Baseline.",
            "results": results,
        }))
    })
}

fn blueprint_metadata(id: &str) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("id".into(), json!(id));
    metadata.insert("type".into(), json!("blueprint"));
    metadata.insert("tags".into(), json!(["ui", "design-system"]));
    metadata.insert("version".into(), json!("1.0.0"));
    metadata
}

/// Measures every format and describes it relative to the JSON+MD baseline.
fn compare(document: &Document) -> Vec<Value> {
    let sizes: Vec<(OutputFormat, EncodedSize)> = OutputFormat::BENCHMARK_ORDER
        .into_iter()
        .map(|format| (format, EncodedSize::of(&codec::encode(document, format))))
        .collect();

    let baseline = sizes
        .iter()
        .find(|(format, _)| *format == BASELINE)
        .map_or(0, |(_, size)| size.chars);

    sizes
        .into_iter()
        .map(|(format, size)| {
            json!({
                "format": format,
                "chars": size.chars,
                "tokens_est": size.tokens_est,
                "diff_vs_baseline": diff_vs_baseline(format, size.chars, baseline),
            })
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn diff_vs_baseline(format: OutputFormat, chars: usize, baseline: usize) -> String {
    if format == BASELINE || baseline == 0 {
        return "BASELINE".to_string();
    }
    let percent = (1.0 - chars as f64 / baseline as f64) * 100.0;
    let direction = if chars < baseline { "savings" } else { "overhead" };
    format!("{percent:.1}% {direction}")
}
