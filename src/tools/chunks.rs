//! Chunking inspection and simulated retrieval across corpus formats.

use serde::Deserialize;
use serde_json::{json, Value};

use super::{Arguments, Field, HandlerFuture, InputSchema, ToolDefinition, ToolError};
use crate::artifacts::{chunk_text, Artifacts, ChunkFormat};

const PREVIEW_CHARS: usize = 100;
const RETRIEVED_CHARS: usize = 150;
const MIN_KEYWORD_CHARS: usize = 3;
const MISSING_SUGGESTION: &str =
    "Run the transform pipelines first (e.g., 'unmess-mcp transform all')";

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "inspect_chunks",
            description: "View how a component is chunked for a specific format \
                          (simulating Vector DB ingestion)",
            schema: InputSchema::new(vec![
                component_field(),
                Field::string("format", "The format to inspect").one_of(&ChunkFormat::NAMES),
            ]),
            handler: inspect_chunks,
        },
        ToolDefinition {
            name: "compare_chunks",
            description: "Compare chunking behavior side-by-side across all formats for a component",
            schema: InputSchema::new(vec![component_field()]),
            handler: compare_chunks,
        },
        ToolDefinition {
            name: "test_retrieval",
            description: "Test retrieval precision by running a query against all formats (Simulated)",
            schema: InputSchema::new(vec![
                Field::string(
                    "query",
                    "The question to ask (e.g., 'What is the size prop?')",
                )
                .min_length(1),
                Field::string("component_name", "The component context (e.g., 'Button')")
                    .file_name(),
            ]),
            handler: test_retrieval,
        },
    ]
}

fn component_field() -> Field {
    Field::string("component_name", "The name of the component (e.g., 'Button')").file_name()
}

#[derive(Deserialize)]
struct InspectParams {
    component_name: String,
    format: String,
}

#[derive(Deserialize)]
struct CompareParams {
    component_name: String,
}

#[derive(Deserialize)]
struct RetrievalParams {
    query: String,
    component_name: String,
}

/// A component's chunks in one format.
struct Chunked {
    format: ChunkFormat,
    chunks: Vec<String>,
}

impl Chunked {
    fn avg_chunk_size(&self) -> String {
        let total: usize = self.chunks.iter().map(|c| c.chars().count()).sum();
        let avg = if self.chunks.is_empty() {
            0
        } else {
            (total + self.chunks.len() / 2) / self.chunks.len()
        };
        format!("{avg} chars")
    }
}

/// Loads and chunks a component, or describes why it is missing.
async fn load_chunks(
    artifacts: &Artifacts,
    component: &str,
    format: ChunkFormat,
) -> Result<Result<Chunked, Value>, ToolError> {
    match artifacts.corpus.load(component, format).await {
        Ok(text) => Ok(Ok(Chunked {
            format,
            chunks: chunk_text(&text, format),
        })),
        Err(e) if e.is_not_found() => Ok(Err(json!({
            "error": format!("Component '{component}' not found for format '{format}'"),
            "path": artifacts.corpus.path_for(component, format).display().to_string(),
            "suggestion": MISSING_SUGGESTION,
        }))),
        Err(e) => Err(e.into()),
    }
}

fn preview(chunk: &str) -> String {
    let head: String = chunk.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head.replace('\n', "\\n"))
}

fn inspect_chunks(artifacts: &Artifacts, args: Arguments) -> HandlerFuture<'_> {
    Box::pin(async move {
        let InspectParams {
            component_name,
            format,
        } = args.parse()?;
        let format: ChunkFormat = format.parse().map_err(ToolError::Execution)?;

        let chunked = match load_chunks(artifacts, &component_name, format).await? {
            Ok(chunked) => chunked,
            Err(missing) => return Ok(missing),
        };

        let chunks: Vec<Value> = chunked
            .chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                json!({
                    "id": i + 1,
                    "size": chunk.chars().count(),
                    "preview": preview(chunk),
                    "content": chunk,
                })
            })
            .collect();

        Ok(json!({
            "component": component_name,
            "format": format,
            "total_chunks": chunks.len(),
            "avg_chunk_size": chunked.avg_chunk_size(),
            "chunks": chunks,
        }))
    })
}

fn compare_chunks(artifacts: &Artifacts, args: Arguments) -> HandlerFuture<'_> {
    Box::pin(async move {
        let CompareParams { component_name } = args.parse()?;
        let component = component_name.as_str();

        let (baseline, toon_md, raw_md, mono_json) = tokio::join!(
            load_chunks(artifacts, component, ChunkFormat::Baseline),
            load_chunks(artifacts, component, ChunkFormat::ToonMd),
            load_chunks(artifacts, component, ChunkFormat::RawMd),
            load_chunks(artifacts, component, ChunkFormat::MonoJson),
        );

        let mut comparison = Vec::with_capacity(ChunkFormat::ALL.len());
        for (format, loaded) in ChunkFormat::ALL
            .into_iter()
            .zip([baseline, toon_md, raw_md, mono_json])
        {
            comparison.push(match loaded? {
                Ok(chunked) => json!({
                    "format": format,
                    "status": "success",
                    "total_chunks": chunked.chunks.len(),
                    "avg_chunk_size": chunked.avg_chunk_size(),
                    "first_chunk_preview": chunked
                        .chunks
                        .first()
                        .map_or_else(|| "N/A".to_string(), |c| preview(c)),
                }),
                Err(missing) => json!({
                    "format": format,
                    "status": "missing",
                    "error": missing["error"],
                }),
            });
        }

        Ok(json!({
            "component": component_name,
            "comparison": comparison,
        }))
    })
}

/// Lowercased query words long enough to be meaningful.
fn keywords(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(' ')
        .filter(|word| word.chars().count() > MIN_KEYWORD_CHARS)
        .map(str::to_string)
        .collect()
}

/// Index and score of the best chunk; the first chunk wins ties.
fn best_chunk(chunks: &[String], keywords: &[String]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for (index, chunk) in chunks.iter().enumerate() {
        let lower = chunk.to_lowercase();
        let score = keywords.iter().filter(|k| lower.contains(k.as_str())).count();
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((index, score));
        }
    }
    best
}

fn retrieve(chunked: &Chunked, keywords: &[String]) -> Value {
    let Some((index, score)) = best_chunk(&chunked.chunks, keywords) else {
        return json!({
            "format": chunked.format,
            "found": false,
            "reason": "No chunks",
        });
    };

    let retrieved: String = chunked.chunks[index].chars().take(RETRIEVED_CHARS).collect();
    json!({
        "format": chunked.format,
        "found": score > 0,
        "top_match_score": score,
        "top_chunk_id": index + 1,
        "retrieved_content": format!("{retrieved}..."),
    })
}

fn test_retrieval(artifacts: &Artifacts, args: Arguments) -> HandlerFuture<'_> {
    Box::pin(async move {
        let RetrievalParams {
            query,
            component_name,
        } = args.parse()?;
        let component = component_name.as_str();
        let keywords = keywords(&query);

        let (baseline, toon_md, raw_md, mono_json) = tokio::join!(
            load_chunks(artifacts, component, ChunkFormat::Baseline),
            load_chunks(artifacts, component, ChunkFormat::ToonMd),
            load_chunks(artifacts, component, ChunkFormat::RawMd),
            load_chunks(artifacts, component, ChunkFormat::MonoJson),
        );

        let mut results = Vec::with_capacity(ChunkFormat::ALL.len());
        for (format, loaded) in ChunkFormat::ALL
            .into_iter()
            .zip([baseline, toon_md, raw_md, mono_json])
        {
            results.push(match loaded? {
                Ok(chunked) => retrieve(&chunked, &keywords),
                Err(_) => json!({
                    "format": format,
                    "found": false,
                    "reason": "Data missing",
                }),
            });
        }

        tracing::debug!(query = %query, component, keywords = keywords.len(), "Simulated retrieval");

        Ok(json!({
            "query": query,
            "component": component_name,
            "results": results,
        }))
    })
}
