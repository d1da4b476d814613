//! File-system backed artifact repositories.
//!
//! Artifacts are read from disk on every request; nothing is cached. Each
//! repository owns one directory:
//!
//! - [`ComponentSpecs`]: component documentation (`*.md`, optional frontmatter)
//! - [`TokenStore`]: design tokens (`*.json`, one file per category)
//! - [`Blueprints`]: long-form blueprint documents used by the format benchmark
//! - [`ChunkCorpus`]: per-format copies of the specs produced by the
//!   transform pipelines
//!
//! Missing files and directories surface as [`ArtifactError::NotFound`] or
//! [`ArtifactError::DirectoryMissing`] so tool handlers can reply with
//! structured data instead of failing.

pub mod blueprints;
pub mod corpus;
mod error;
pub mod frontmatter;
pub mod specs;
pub mod tokens;

pub use blueprints::Blueprints;
pub use corpus::{chunk_text, ChunkCorpus, ChunkFormat};
pub use error::{ArtifactError, ArtifactKind, ArtifactResult};
pub use specs::ComponentSpecs;
pub use tokens::{TokenCategory, TokenSelection, TokenStore};

use std::io;
use std::path::{Path, PathBuf};

/// Default component specs directory, relative to the design-system root.
pub const DEFAULT_SPECS_DIR: &str = "component-specs";
/// Default design tokens directory, relative to the design-system root.
pub const DEFAULT_TOKENS_DIR: &str = "src/tokens";
/// Default blueprints directory, relative to the design-system root.
pub const DEFAULT_BLUEPRINTS_DIR: &str = "context-engine";
/// Default benchmark corpus directory, relative to the design-system root.
pub const DEFAULT_CORPUS_DIR: &str = "test-data";

/// Resolved locations of every artifact directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    /// Component spec markdown files.
    pub specs_dir: PathBuf,
    /// Design token JSON files.
    pub tokens_dir: PathBuf,
    /// Blueprint markdown files.
    pub blueprints_dir: PathBuf,
    /// Root of the materialised benchmark corpora.
    pub corpus_dir: PathBuf,
}

impl ArtifactLayout {
    /// The default layout below a design-system root.
    #[must_use]
    pub fn from_root(root: &Path) -> Self {
        Self {
            specs_dir: root.join(DEFAULT_SPECS_DIR),
            tokens_dir: root.join(DEFAULT_TOKENS_DIR),
            blueprints_dir: root.join(DEFAULT_BLUEPRINTS_DIR),
            corpus_dir: root.join(DEFAULT_CORPUS_DIR),
        }
    }
}

/// All artifact repositories, as handed to tool handlers.
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// Component documentation.
    pub specs: ComponentSpecs,
    /// Design tokens.
    pub tokens: TokenStore,
    /// Benchmark blueprints.
    pub blueprints: Blueprints,
    /// Per-format chunking corpora.
    pub corpus: ChunkCorpus,
}

impl Artifacts {
    /// Builds the repositories for a layout.
    #[must_use]
    pub fn new(layout: &ArtifactLayout) -> Self {
        Self {
            specs: ComponentSpecs::new(&layout.specs_dir),
            tokens: TokenStore::new(&layout.tokens_dir),
            blueprints: Blueprints::new(&layout.blueprints_dir),
            corpus: ChunkCorpus::new(&layout.specs_dir, &layout.corpus_dir),
        }
    }
}

/// Lists the files in `dir` with the given extension, sorted by file name.
pub(crate) async fn list_files(
    dir: &Path,
    extension: &str,
    kind: ArtifactKind,
) -> ArtifactResult<Vec<PathBuf>> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(ArtifactError::DirectoryMissing {
                kind,
                path: dir.to_path_buf(),
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ArtifactError::DirectoryMissing {
                kind,
                path: dir.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(ArtifactError::Read {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    }

    let read_err = |source| ArtifactError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if entry.file_type().await.map_err(read_err)?.is_file() {
            files.push(path);
        }
    }

    files.sort();
    tracing::trace!(dir = %dir.display(), count = files.len(), "Listed artifact files");
    Ok(files)
}

/// Reads a UTF-8 artifact, mapping a missing file to `NotFound`.
pub(crate) async fn read_text(path: &Path, kind: ArtifactKind, name: &str) -> ArtifactResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ArtifactError::NotFound {
                kind,
                name: name.to_string(),
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// The file stem of an artifact path, used as its logical name.
pub(crate) fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
