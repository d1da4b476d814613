//! Blueprint documents used by the format benchmark.

use std::path::{Path, PathBuf};

use super::{list_files, read_text, ArtifactError, ArtifactKind, ArtifactResult};

/// Repository over a directory of blueprint markdown files.
#[derive(Debug, Clone)]
pub struct Blueprints {
    dir: PathBuf,
}

impl Blueprints {
    /// Creates a repository rooted at `dir`.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Loads a blueprint by file name (extension included).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file does not exist.
    pub async fn load(&self, file_name: &str) -> ArtifactResult<String> {
        read_text(&self.dir.join(file_name), ArtifactKind::Blueprint, file_name).await
    }

    /// Lists available blueprint file names; empty when the directory is missing.
    ///
    /// # Errors
    ///
    /// Returns `Read` if the directory exists but cannot be listed.
    pub async fn list(&self) -> ArtifactResult<Vec<String>> {
        match list_files(&self.dir, "md", ArtifactKind::Blueprint).await {
            Ok(files) => Ok(files
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect()),
            Err(ArtifactError::DirectoryMissing { .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_and_list() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ui_blueprint.md"), "# UI").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip").unwrap();

        let blueprints = Blueprints::new(dir.path());
        assert_eq!(blueprints.load("ui_blueprint.md").await.unwrap(), "# UI");
        assert_eq!(blueprints.list().await.unwrap(), vec!["ui_blueprint.md"]);
        assert!(blueprints.load("missing.md").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let blueprints = Blueprints::new(&dir.path().join("context-engine"));
        assert!(blueprints.list().await.unwrap().is_empty());
    }
}
