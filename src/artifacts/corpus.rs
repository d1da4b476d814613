//! Per-format benchmark corpora and the chunker that splits them.
//!
//! The `baseline` format reads the component specs directly. The other
//! formats read the copies written by the transform pipelines:
//!
//! ```text
//! <corpus>/test-2-toon-md/components/<Name>.md
//! <corpus>/test-3-pure-md/components/<Name>.md
//! <corpus>/test-4-mono-json/components/<Name>.json
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use super::{read_text, ArtifactKind, ArtifactResult};

/// Sub-directory holding each pipeline's component files.
pub const COMPONENTS_SUBDIR: &str = "components";

/// Sub-directory holding each pipeline's token files.
pub const TOKENS_SUBDIR: &str = "tokens";

/// A chunking format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkFormat {
    /// Original specs with YAML frontmatter.
    Baseline,
    /// Specs with a toon header block.
    ToonMd,
    /// Specs with the frontmatter stripped.
    RawMd,
    /// Specs split into a nested JSON document.
    MonoJson,
}

impl ChunkFormat {
    /// Every format, in comparison order.
    pub const ALL: [Self; 4] = [Self::Baseline, Self::ToonMd, Self::RawMd, Self::MonoJson];

    /// Accepted names, in comparison order.
    pub const NAMES: [&'static str; 4] = ["baseline", "toon_md", "raw_md", "mono_json"];

    /// The wire name of this format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::ToonMd => "toon_md",
            Self::RawMd => "raw_md",
            Self::MonoJson => "mono_json",
        }
    }

    /// The pipeline output directory for this format, if it has one.
    #[must_use]
    pub const fn test_dir(self) -> Option<&'static str> {
        match self {
            Self::Baseline => None,
            Self::ToonMd => Some("test-2-toon-md"),
            Self::RawMd => Some("test-3-pure-md"),
            Self::MonoJson => Some("test-4-mono-json"),
        }
    }

    /// File extension of component files in this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::MonoJson => "json",
            _ => "md",
        }
    }
}

impl fmt::Display for ChunkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown chunk format '{s}'"))
    }
}

/// Repository over the baseline specs and the transformed corpora.
#[derive(Debug, Clone)]
pub struct ChunkCorpus {
    specs_dir: PathBuf,
    corpus_dir: PathBuf,
}

impl ChunkCorpus {
    /// Creates a corpus over the specs directory and the pipeline output root.
    #[must_use]
    pub fn new(specs_dir: &Path, corpus_dir: &Path) -> Self {
        Self {
            specs_dir: specs_dir.to_path_buf(),
            corpus_dir: corpus_dir.to_path_buf(),
        }
    }

    /// Where a component's file lives for a format.
    #[must_use]
    pub fn path_for(&self, component: &str, format: ChunkFormat) -> PathBuf {
        let dir = format.test_dir().map_or_else(
            || self.specs_dir.clone(),
            |test_dir| self.corpus_dir.join(test_dir).join(COMPONENTS_SUBDIR),
        );
        dir.join(format!("{component}.{}", format.extension()))
    }

    /// Loads a component's file for a format.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file has not been materialised.
    pub async fn load(&self, component: &str, format: ChunkFormat) -> ArtifactResult<String> {
        read_text(
            &self.path_for(component, format),
            ArtifactKind::CorpusFile,
            component,
        )
        .await
    }
}

/// Splits content into retrieval chunks.
///
/// JSON documents are a single chunk. Markdown is split before every line
/// starting with `#`; whitespace-only chunks are dropped.
#[must_use]
pub fn chunk_text(text: &str, format: ChunkFormat) -> Vec<String> {
    if format == ChunkFormat::MonoJson {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if line.starts_with('#') && !current.is_empty() {
            chunks.push(current.join("\n"));
            current.clear();
        }
        current.push(line);
    }
    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks.retain(|c| !c.trim().is_empty());
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_splits_on_headings() {
        let text = "intro line\n# Button\nbody\n## Props\n- size\n";
        let chunks = chunk_text(text, ChunkFormat::RawMd);
        assert_eq!(
            chunks,
            vec!["intro line", "# Button\nbody", "## Props\n- size\n"]
        );
    }

    #[test]
    fn blank_chunks_are_dropped() {
        let chunks = chunk_text("\n\n# A\n", ChunkFormat::Baseline);
        assert_eq!(chunks, vec!["# A\n"]);
        assert!(chunk_text("", ChunkFormat::ToonMd).is_empty());
    }

    #[test]
    fn json_is_one_chunk() {
        let text = "{\n  \"sections\": {}\n}";
        assert_eq!(chunk_text(text, ChunkFormat::MonoJson), vec![text]);
    }

    #[test]
    fn paths_per_format() {
        let corpus = ChunkCorpus::new(Path::new("/ds/specs"), Path::new("/ds/test-data"));
        assert_eq!(
            corpus.path_for("Button", ChunkFormat::Baseline),
            PathBuf::from("/ds/specs/Button.md")
        );
        assert_eq!(
            corpus.path_for("Button", ChunkFormat::MonoJson),
            PathBuf::from("/ds/test-data/test-4-mono-json/components/Button.json")
        );
        assert_eq!(
            corpus.path_for("Button", ChunkFormat::ToonMd),
            PathBuf::from("/ds/test-data/test-2-toon-md/components/Button.md")
        );
    }

    #[test]
    fn format_names_match() {
        for (format, name) in ChunkFormat::ALL.into_iter().zip(ChunkFormat::NAMES) {
            assert_eq!(format.as_str(), name);
            assert_eq!(name.parse::<ChunkFormat>(), Ok(format));
        }
    }
}
