//! Batch converters that rewrite the component specs and token files into
//! the alternate encodings used by the chunking benchmarks.
//!
//! Each pipeline reads `<specs>/*.md` and `<tokens>/*.json` and writes a
//! parallel tree below the output root:
//!
//! ```text
//! <out>/test-2-toon-md/{components,tokens}     (toon-md)
//! <out>/test-3-pure-md/{components,tokens}     (pure-md)
//! <out>/test-4-mono-json/{components,tokens}   (mono-json)
//! ```
//!
//! Pipelines are plain synchronous code; they run from the CLI, never from
//! the server loop.

mod error;
pub mod mono_json;
pub mod pure_md;
pub mod toon_md;

pub use error::{TransformError, TransformResult};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;

use crate::artifacts::corpus::{COMPONENTS_SUBDIR, TOKENS_SUBDIR};
use crate::codec::pretty;

/// A transform pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    /// Frontmatter rewritten as a toon block; tokens as toon.
    ToonMd,
    /// Frontmatter stripped; tokens as markdown tables.
    PureMd,
    /// Specs split into nested JSON; tokens copied.
    MonoJson,
}

impl Pipeline {
    /// Every pipeline, in run order.
    pub const ALL: [Self; 3] = [Self::ToonMd, Self::PureMd, Self::MonoJson];

    /// The CLI name of this pipeline.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToonMd => "toon-md",
            Self::PureMd => "pure-md",
            Self::MonoJson => "mono-json",
        }
    }

    /// The directory this pipeline writes below the output root.
    #[must_use]
    pub const fn test_dir(self) -> &'static str {
        match self {
            Self::ToonMd => "test-2-toon-md",
            Self::PureMd => "test-3-pure-md",
            Self::MonoJson => "test-4-mono-json",
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pipeline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown pipeline '{s}'"))
    }
}

/// Files written by one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// Component files written.
    pub components: Vec<PathBuf>,
    /// Token files written.
    pub tokens: Vec<PathBuf>,
}

impl TransformReport {
    /// Total number of files written.
    #[must_use]
    pub fn total(&self) -> usize {
        self.components.len() + self.tokens.len()
    }
}

/// Runs a pipeline over the specs and tokens directories.
///
/// # Errors
///
/// Fails on the first missing input directory, unreadable input, invalid
/// token JSON or failed write. Files written before the failure are kept.
pub fn run(
    pipeline: Pipeline,
    specs_dir: &Path,
    tokens_dir: &Path,
    output_root: &Path,
) -> TransformResult<TransformReport> {
    let base = output_root.join(pipeline.test_dir());
    let components_out = base.join(COMPONENTS_SUBDIR);
    let tokens_out = base.join(TOKENS_SUBDIR);

    let specs = input_files(specs_dir, "md")?;
    let token_files = input_files(tokens_dir, "json")?;

    create_dir(&components_out)?;
    create_dir(&tokens_out)?;

    tracing::info!(
        pipeline = %pipeline,
        specs = specs.len(),
        tokens = token_files.len(),
        output = %base.display(),
        "Running transform pipeline"
    );

    let mut report = TransformReport::default();

    for path in &specs {
        let content = read(path)?;
        let stem = file_stem(path);
        let (file_name, output) = match pipeline {
            Pipeline::ToonMd => (format!("{stem}.md"), toon_md::transform_spec(&content)),
            Pipeline::PureMd => (format!("{stem}.md"), pure_md::transform_spec(&content)),
            Pipeline::MonoJson => (
                format!("{stem}.json"),
                pretty(&mono_json::transform_spec(&content)),
            ),
        };
        let target = components_out.join(file_name);
        write(&target, &output)?;
        tracing::debug!(source = %path.display(), target = %target.display(), "Converted spec");
        report.components.push(target);
    }

    for path in &token_files {
        let content = read(path)?;
        let stem = file_stem(path);
        let (file_name, output) = match pipeline {
            Pipeline::ToonMd => (
                format!("{stem}.toon"),
                toon_md::transform_tokens(&parse_json(path, &content)?),
            ),
            Pipeline::PureMd => (
                format!("{stem}.md"),
                pure_md::tokens_table(&stem, &parse_json(path, &content)?),
            ),
            Pipeline::MonoJson => (format!("{stem}.json"), content),
        };
        let target = tokens_out.join(file_name);
        write(&target, &output)?;
        tracing::debug!(source = %path.display(), target = %target.display(), "Converted tokens");
        report.tokens.push(target);
    }

    tracing::info!(pipeline = %pipeline, written = report.total(), "Transform pipeline complete");
    Ok(report)
}

/// Enumerates `<dir>/*.<extension>` in sorted order.
fn input_files(dir: &Path, extension: &str) -> TransformResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(TransformError::InputMissing {
            path: dir.to_path_buf(),
        });
    }

    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{escaped}/*.{extension}");
    let entries = glob::glob(&pattern).map_err(|source| TransformError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable input entry");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read(path: &Path) -> TransformResult<String> {
    fs::read_to_string(path).map_err(|source| TransformError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json(path: &Path, content: &str) -> TransformResult<Value> {
    serde_json::from_str(content).map_err(|source| TransformError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir(path: &Path) -> TransformResult<()> {
    fs::create_dir_all(path).map_err(|source| TransformError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> TransformResult<()> {
    fs::write(path, contents).map_err(|source| TransformError::Write {
        path: path.to_path_buf(),
        source,
    })
}
