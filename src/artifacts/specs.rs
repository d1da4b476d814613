//! Component documentation specs.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use super::{frontmatter, list_files, read_text, stem, ArtifactKind, ArtifactResult};

/// Maximum number of search results returned.
pub const SEARCH_LIMIT: usize = 10;

const NO_DESCRIPTION: &str = "No description available";

/// A component spec loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSpec {
    /// Component name (the file stem).
    pub name: String,
    /// Full markdown content, frontmatter included.
    pub content: String,
    /// Parsed frontmatter fields, if the file has a frontmatter block.
    pub metadata: Option<Map<String, Value>>,
}

/// One entry of the component listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecSummary {
    /// Component name.
    pub name: String,
    /// First descriptive line of the spec.
    pub description: String,
}

/// One component search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecMatch {
    /// Component name.
    pub component: String,
    /// Number of query occurrences in the content.
    pub relevance: usize,
    /// The first line mentioning the query, or the first descriptive line.
    pub snippet: Option<String>,
}

/// Result of a component search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecSearch {
    /// The query as given.
    pub query: String,
    /// Total number of matching components.
    pub found: usize,
    /// The best matches, most relevant first.
    pub results: Vec<SpecMatch>,
}

/// Repository over a directory of component spec markdown files.
#[derive(Debug, Clone)]
pub struct ComponentSpecs {
    dir: PathBuf,
}

impl ComponentSpecs {
    /// Creates a repository rooted at `dir`.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// The directory this repository reads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads `<dir>/<name>.md`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the spec does not exist, or `Read` on I/O failure.
    pub async fn get(&self, name: &str) -> ArtifactResult<ComponentSpec> {
        let path = self.dir.join(format!("{name}.md"));
        let content = read_text(&path, ArtifactKind::Component, name).await?;
        let metadata = frontmatter::parse(&content);

        Ok(ComponentSpec {
            name: name.to_string(),
            content,
            metadata,
        })
    }

    /// Lists every spec with a short description, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryMissing` if the specs directory does not exist.
    pub async fn list(&self) -> ArtifactResult<Vec<SpecSummary>> {
        let files = list_files(&self.dir, "md", ArtifactKind::Component).await?;
        let mut summaries = Vec::with_capacity(files.len());

        for path in files {
            let name = stem(&path);
            let content = read_text(&path, ArtifactKind::Component, &name).await?;
            summaries.push(SpecSummary {
                description: describe(&content),
                name,
            });
        }

        Ok(summaries)
    }

    /// Case-insensitive keyword search over spec names and content.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryMissing` if the specs directory does not exist.
    pub async fn search(&self, query: &str) -> ArtifactResult<SpecSearch> {
        let files = list_files(&self.dir, "md", ArtifactKind::Component).await?;
        let query_lower = query.to_lowercase();
        let mut results = Vec::new();

        for path in files {
            let name = stem(&path);
            let content = read_text(&path, ArtifactKind::Component, &name).await?;
            let content_lower = content.to_lowercase();

            if !content_lower.contains(&query_lower) && !name.to_lowercase().contains(&query_lower)
            {
                continue;
            }

            let snippet = content
                .lines()
                .find(|line| line.to_lowercase().contains(&query_lower))
                .or_else(|| {
                    content
                        .lines()
                        .find(|line| !line.trim().is_empty() && !line.starts_with('#'))
                })
                .map(|line| line.trim().to_string());

            results.push(SpecMatch {
                component: name,
                relevance: content_lower.matches(&query_lower).count(),
                snippet,
            });
        }

        // Stable: equal relevance keeps name order.
        results.sort_by(|a, b| b.relevance.cmp(&a.relevance));
        let found = results.len();
        results.truncate(SEARCH_LIMIT);

        tracing::debug!(query, found, "Searched component specs");

        Ok(SpecSearch {
            query: query.to_string(),
            found,
            results,
        })
    }
}

/// Extracts a one-line description: the first non-empty line that is neither
/// a heading nor a `---` fence.
#[must_use]
pub fn describe(content: &str) -> String {
    content
        .lines()
        .find(|line| !line.trim().is_empty() && !line.starts_with('#') && !line.starts_with("---"))
        .map_or_else(|| NO_DESCRIPTION.to_string(), |line| line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactError;

    fn specs_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn describe_skips_headings_and_fences() {
        assert_eq!(describe("# Button\n\nA clickable action.\n"), "A clickable action.");
        assert_eq!(describe("---\n# T\n  \n  Indented line  "), "Indented line");
        assert_eq!(describe("# Only heading"), NO_DESCRIPTION);
    }

    #[tokio::test]
    async fn get_parses_frontmatter() {
        let dir = specs_dir(&[("Button.md", "---\nstatus: stable\n---\n# Button\n")]);
        let spec = ComponentSpecs::new(dir.path()).get("Button").await.unwrap();
        assert_eq!(spec.name, "Button");
        assert!(spec.content.contains("# Button"));
        assert_eq!(spec.metadata.unwrap()["status"], "stable");
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let dir = specs_dir(&[]);
        let err = ComponentSpecs::new(dir.path()).get("Nope").await.unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound { .. }));
    }

    #[tokio::test]
    async fn search_ranks_by_occurrences() {
        let dir = specs_dir(&[
            ("Card.md", "# Card\n\nA surface.\n"),
            ("Form.md", "# Form\n\nForm fields. Form layout. Submit a form.\n"),
            ("Input.md", "# Input\n\nUsed in a form.\n"),
        ]);
        let search = ComponentSpecs::new(dir.path()).search("FORM").await.unwrap();
        assert_eq!(search.found, 2);
        assert_eq!(search.results[0].component, "Form");
        assert_eq!(search.results[0].relevance, 4);
        assert_eq!(search.results[0].snippet.as_deref(), Some("# Form"));
        assert_eq!(search.results[1].component, "Input");
        assert_eq!(search.results[1].snippet.as_deref(), Some("Used in a form."));
    }

    #[tokio::test]
    async fn search_matches_name_without_content_hit() {
        let dir = specs_dir(&[("TagChip.md", "# Chip\n\nSmall label.\n")]);
        let search = ComponentSpecs::new(dir.path()).search("tagchip").await.unwrap();
        assert_eq!(search.found, 1);
        assert_eq!(search.results[0].relevance, 0);
        assert_eq!(search.results[0].snippet.as_deref(), Some("Small label."));
    }

    #[tokio::test]
    async fn search_ties_keep_name_order() {
        let dir = specs_dir(&[
            ("B.md", "grid"),
            ("A.md", "grid"),
            ("C.md", "grid"),
        ]);
        let search = ComponentSpecs::new(dir.path()).search("grid").await.unwrap();
        let names: Vec<_> = search.results.iter().map(|r| r.component.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
