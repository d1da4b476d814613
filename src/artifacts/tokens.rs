//! Design tokens stored as one JSON file per category.
//!
//! Token files follow the design-tokens draft format: a token is an object
//! carrying a `$value` (plus optional `$type`/`$description`), grouped in
//! arbitrarily nested objects. Values may reference other tokens with
//! `{group.token}` syntax.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{list_files, read_text, stem, ArtifactError, ArtifactKind, ArtifactResult};

/// Maximum number of search results returned.
pub const SEARCH_LIMIT: usize = 20;

/// Reference chains deeper than this are left unresolved.
const MAX_REFERENCE_DEPTH: usize = 16;

const VALUE_KEY: &str = "$value";

/// A single token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// Colour palette.
    Colors,
    /// Spacing scale.
    Spacing,
    /// Type scale and font families.
    Typography,
    /// Corner radii.
    Radius,
    /// Elevation shadows.
    Shadows,
}

impl TokenCategory {
    /// Every category, in advertised order.
    pub const ALL: [Self; 5] = [
        Self::Colors,
        Self::Spacing,
        Self::Typography,
        Self::Radius,
        Self::Shadows,
    ];

    /// The category name, which is also the token file stem.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Colors => "colors",
            Self::Spacing => "spacing",
            Self::Typography => "typography",
            Self::Radius => "radius",
            Self::Shadows => "shadows",
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What `get_tokens` should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSelection {
    /// Every token file in the directory.
    All,
    /// One category.
    Category(TokenCategory),
}

impl TokenSelection {
    /// Accepted names: every category plus `all`.
    pub const NAMES: [&'static str; 6] = [
        "colors",
        "spacing",
        "typography",
        "radius",
        "shadows",
        "all",
    ];

    /// The selection name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Category(category) => category.as_str(),
        }
    }
}

impl FromStr for TokenSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        TokenCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .map(Self::Category)
            .ok_or_else(|| format!("unknown token category '{s}'"))
    }
}

/// How a search hit matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// The dotted token path contains the query.
    Name,
    /// The token value contains the query.
    Value,
}

/// One token search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMatch {
    /// File stem the token came from.
    pub category: String,
    /// Dotted token path.
    pub token: String,
    /// The token's raw value.
    pub value: Value,
    /// Whether the name or the value matched.
    pub match_type: MatchType,
}

/// Result of a token search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenSearch {
    /// The query as given.
    pub query: String,
    /// Total number of matches.
    pub found: usize,
    /// Matches in discovery order, capped at [`SEARCH_LIMIT`].
    pub results: Vec<TokenMatch>,
}

/// Repository over a directory of token JSON files.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
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

    /// Loads every token file, keyed by file stem in name order.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryMissing` if the directory does not exist, or a
    /// `Read`/`Json` error for an unreadable file.
    pub async fn load_all(&self) -> ArtifactResult<Map<String, Value>> {
        let files = list_files(&self.dir, "json", ArtifactKind::TokenCategory).await?;
        let mut all = Map::new();
        for path in files {
            let name = stem(&path);
            let value = read_json(&path, &name).await?;
            all.insert(name, value);
        }
        Ok(all)
    }

    /// Fetches one category, or all of them.
    ///
    /// With `resolve`, token objects collapse to their values and references
    /// are substituted; otherwise the raw JSON is returned.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryMissing` if the directory does not exist and
    /// `NotFound` if the category file does not.
    pub async fn get(&self, selection: TokenSelection, resolve: bool) -> ArtifactResult<Value> {
        ensure_dir(&self.dir).await?;

        let TokenSelection::Category(category) = selection else {
            let all = self.load_all().await?;
            if !resolve {
                return Ok(Value::Object(all));
            }
            let context = reference_context(&all);
            let mut resolver = Resolver::new(&context);
            let resolved = all
                .iter()
                .map(|(name, tokens)| (name.clone(), resolver.resolve(tokens)))
                .collect();
            return Ok(Value::Object(resolved));
        };

        let path = self.dir.join(format!("{category}.json"));
        let raw = read_json(&path, category.as_str()).await?;
        if !resolve {
            return Ok(raw);
        }

        let context = reference_context(&self.load_siblings().await);
        Ok(Resolver::new(&context).resolve(&raw))
    }

    /// Loads every token file that parses, for use as reference context.
    ///
    /// A broken file only costs its own references, so it is skipped with a
    /// warning instead of failing the request.
    async fn load_siblings(&self) -> Map<String, Value> {
        let mut all = Map::new();
        let files = match list_files(&self.dir, "json", ArtifactKind::TokenCategory).await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(error = %e, "Could not list token files for references");
                return all;
            }
        };
        for path in files {
            let name = stem(&path);
            match read_json(&path, &name).await {
                Ok(value) => {
                    all.insert(name, value);
                }
                Err(e) => tracing::warn!(file = %path.display(), error = %e, "Skipping token file"),
            }
        }
        all
    }

    /// Searches token paths and values for `query`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryMissing` if the directory does not exist.
    pub async fn search(&self, query: &str) -> ArtifactResult<TokenSearch> {
        let all = self.load_all().await?;
        let query_lower = query.to_lowercase();
        let mut results = Vec::new();

        for (category, tokens) in &all {
            if let Value::Object(map) = tokens {
                collect_matches(category, map, "", &query_lower, &mut results);
            }
        }

        let found = results.len();
        results.truncate(SEARCH_LIMIT);
        tracing::debug!(query, found, "Searched design tokens");

        Ok(TokenSearch {
            query: query.to_string(),
            found,
            results,
        })
    }
}

async fn ensure_dir(dir: &Path) -> ArtifactResult<()> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(ArtifactError::DirectoryMissing {
            kind: ArtifactKind::TokenCategory,
            path: dir.to_path_buf(),
        }),
    }
}

async fn read_json(path: &Path, name: &str) -> ArtifactResult<Value> {
    let content = read_text(path, ArtifactKind::TokenCategory, name).await?;
    serde_json::from_str(&content).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn collect_matches(
    category: &str,
    node: &Map<String, Value>,
    prefix: &str,
    query_lower: &str,
    out: &mut Vec<TokenMatch>,
) {
    for (key, value) in node {
        if key.starts_with('$') {
            continue;
        }
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        let leaf = match value {
            Value::Object(group) if !group.contains_key(VALUE_KEY) => {
                collect_matches(category, group, &path, query_lower, out);
                continue;
            }
            Value::Object(token) => &token[VALUE_KEY],
            other => other,
        };

        let name_match = path.to_lowercase().contains(query_lower);
        let value_match = stringify(leaf).to_lowercase().contains(query_lower);
        if name_match || value_match {
            out.push(TokenMatch {
                category: category.to_string(),
                token: path,
                value: leaf.clone(),
                match_type: if name_match {
                    MatchType::Name
                } else {
                    MatchType::Value
                },
            });
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds the lookup table for `{path}` references.
///
/// Each file contributes its top-level groups (so `colors.json` holding
/// `{"color": {...}}` answers `{color.primary}`); file stems are added where
/// they do not clash, so `{colors.primary}` also works for flat files.
#[must_use]
pub fn reference_context(files: &Map<String, Value>) -> Map<String, Value> {
    let mut context = Map::new();
    for tokens in files.values() {
        if let Value::Object(groups) = tokens {
            for (key, group) in groups {
                if !key.starts_with('$') && !context.contains_key(key) {
                    context.insert(key.clone(), group.clone());
                }
            }
        }
    }
    for (name, tokens) in files {
        if !context.contains_key(name) {
            context.insert(name.clone(), tokens.clone());
        }
    }
    context
}

/// Collapses token objects and substitutes `{path}` references.
///
/// Every reference is resolved at most once per resolver. A reference that
/// leads back to itself is left verbatim, as is every token on that cycle.
pub struct Resolver<'a> {
    context: &'a Map<String, Value>,
    resolved: HashMap<String, Option<String>>,
    stack: Vec<String>,
    cyclic: HashSet<String>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over a reference context.
    #[must_use]
    pub fn new(context: &'a Map<String, Value>) -> Self {
        Self {
            context,
            resolved: HashMap::new(),
            stack: Vec::new(),
            cyclic: HashSet::new(),
        }
    }

    /// Resolves a token tree.
    pub fn resolve(&mut self, node: &Value) -> Value {
        match node {
            Value::Object(map) => {
                if let Some(value) = map.get(VALUE_KEY) {
                    return self.resolve(value);
                }
                Value::Object(
                    map.iter()
                        .filter(|(key, _)| *key != "$schema" && *key != "$type")
                        .map(|(key, value)| (key.clone(), self.resolve(value)))
                        .collect(),
                )
            }
            Value::Array(items) => Value::Array(items.iter().map(|v| self.resolve(v)).collect()),
            Value::String(text) => Value::String(self.substitute(text)),
            scalar => scalar.clone(),
        }
    }

    fn substitute(&mut self, text: &str) -> String {
        if !text.contains('{') {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if close > 0 => {
                    let path = &after[..close];
                    match self.lookup(path) {
                        Some(resolved) => out.push_str(&resolved),
                        None => {
                            tracing::warn!(reference = path, "Could not resolve token reference");
                            out.push('{');
                            out.push_str(path);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn lookup(&mut self, path: &str) -> Option<String> {
        if let Some(done) = self.resolved.get(path) {
            return done.clone();
        }
        if let Some(pos) = self.stack.iter().position(|p| p == path) {
            self.cyclic.extend(self.stack[pos..].iter().cloned());
            return None;
        }
        if self.stack.len() >= MAX_REFERENCE_DEPTH {
            return None;
        }

        let result = match self.target(path)? {
            Value::String(s) => {
                self.stack.push(path.to_string());
                let substituted = self.substitute(s);
                self.stack.pop();
                Some(substituted).filter(|_| !self.cyclic.contains(path))
            }
            Value::Null => None,
            other => Some(other.to_string()),
        };
        self.resolved.insert(path.to_string(), result.clone());
        result
    }

    /// The token a dotted path points at: a `$value` or a bare scalar leaf.
    fn target(&self, path: &str) -> Option<&'a Value> {
        let context = self.context;
        let mut parts = path.split('.');
        let mut current = context.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }

        match current {
            Value::Object(token) => token.get(VALUE_KEY),
            leaf => Some(leaf),
        }
    }
}
