//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::artifacts::{
    ArtifactLayout, DEFAULT_BLUEPRINTS_DIR, DEFAULT_CORPUS_DIR, DEFAULT_SPECS_DIR,
    DEFAULT_TOKENS_DIR,
};
use crate::error::ConfigError;

/// Log levels accepted in `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure.
///
/// Every artifact directory is resolved against `root` unless absolute.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Design-system root. Defaults to the working directory.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Component spec directory.
    #[serde(default)]
    pub specs_dir: Option<PathBuf>,

    /// Design token directory.
    #[serde(default)]
    pub tokens_dir: Option<PathBuf>,

    /// Blueprint directory.
    #[serde(default)]
    pub blueprints_dir: Option<PathBuf>,

    /// Benchmark corpus root, also the default transform output.
    #[serde(default)]
    pub corpus_dir: Option<PathBuf>,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }

        for (key, dir) in [
            ("specs_dir", &self.specs_dir),
            ("tokens_dir", &self.tokens_dir),
            ("blueprints_dir", &self.blueprints_dir),
            ("corpus_dir", &self.corpus_dir),
        ] {
            if dir.as_ref().is_some_and(|d| d.as_os_str().is_empty()) {
                return Err(ConfigError::ValidationError {
                    message: format!("'{key}' must not be empty"),
                });
            }
        }
        Ok(())
    }

    /// Resolves the artifact layout.
    ///
    /// `root_override` (from `--root` or `DESIGN_SYSTEM_ROOT`) wins over the
    /// configured root; with neither, the working directory is used.
    #[must_use]
    pub fn layout(&self, root_override: Option<&Path>) -> ArtifactLayout {
        let root = root_override
            .or(self.root.as_deref())
            .unwrap_or_else(|| Path::new("."));

        let resolve = |configured: &Option<PathBuf>, default: &str| match configured {
            Some(dir) => root.join(dir),
            None => root.join(default),
        };

        ArtifactLayout {
            specs_dir: resolve(&self.specs_dir, DEFAULT_SPECS_DIR),
            tokens_dir: resolve(&self.tokens_dir, DEFAULT_TOKENS_DIR),
            blueprints_dir: resolve(&self.blueprints_dir, DEFAULT_BLUEPRINTS_DIR),
            corpus_dir: resolve(&self.corpus_dir, DEFAULT_CORPUS_DIR),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(
            config.layout(None),
            ArtifactLayout::from_root(Path::new("."))
        );
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "root": "/srv/design",
            "specs_dir": "docs/components",
            "tokens_dir": "/opt/tokens",
            "blueprints_dir": "blueprints",
            "corpus_dir": "out",
            "logging": { "level": "debug" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());

        let layout = config.layout(None);
        assert_eq!(layout.specs_dir, PathBuf::from("/srv/design/docs/components"));
        assert_eq!(layout.tokens_dir, PathBuf::from("/opt/tokens"));
        assert_eq!(layout.blueprints_dir, PathBuf::from("/srv/design/blueprints"));
        assert_eq!(layout.corpus_dir, PathBuf::from("/srv/design/out"));
    }

    #[test]
    fn root_override_wins() {
        let config: Config = serde_json::from_str(r#"{"root": "/a"}"#).unwrap();
        let layout = config.layout(Some(Path::new("/b")));
        assert_eq!(layout.specs_dir, PathBuf::from("/b/component-specs"));
        assert_eq!(layout.tokens_dir, PathBuf::from("/b/src/tokens"));
    }

    #[test]
    fn reject_unknown_fields() {
        let result: Result<Config, _> = serde_json::from_str(r#"{"library_path": "/x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn reject_invalid_log_level() {
        let config: Config =
            serde_json::from_str(r#"{"logging": {"level": "loud"}}"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn reject_empty_directory() {
        let config: Config = serde_json::from_str(r#"{"tokens_dir": ""}"#).unwrap();
        assert!(config.validate().is_err());
    }
}
