//! Format codecs used to benchmark retrieval encodings.
//!
//! Every codec turns the same [`Document`] (a metadata object plus a markdown
//! body) into one textual encoding:
//!
//! | Format | Output |
//! |--------|--------|
//! | `raw_md` | the body, metadata discarded |
//! | `toon_md` | toon metadata in a `---` fence above the body |
//! | `json_md` | `{metadata, content_raw}` as indented JSON |
//! | `json` | metadata fields plus `content_structured` as indented JSON |
//!
//! Codecs are pure: the same input always produces byte-identical output.

pub mod toon;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A metadata/content pair fed to the codecs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Ordered metadata fields.
    pub metadata: Map<String, Value>,
    /// Markdown body.
    pub content: String,
}

impl Document {
    /// Creates a document from metadata and content.
    #[must_use]
    pub fn new(metadata: Map<String, Value>, content: impl Into<String>) -> Self {
        Self {
            metadata,
            content: content.into(),
        }
    }
}

/// The encodings a [`Document`] can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Body only.
    RawMd,
    /// Toon metadata header plus body.
    ToonMd,
    /// JSON envelope with the body as a string field.
    JsonMd,
    /// Flat JSON object.
    Json,
}

impl OutputFormat {
    /// All formats, in benchmark order (baseline first).
    pub const BENCHMARK_ORDER: [Self; 4] = [Self::JsonMd, Self::ToonMd, Self::Json, Self::RawMd];

    /// The wire name of this format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RawMd => "raw_md",
            Self::ToonMd => "toon_md",
            Self::JsonMd => "json_md",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw_md" => Ok(Self::RawMd),
            "toon_md" => Ok(Self::ToonMd),
            "json_md" => Ok(Self::JsonMd),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

/// Renders a document in the given format.
#[must_use]
pub fn encode(document: &Document, format: OutputFormat) -> String {
    match format {
        OutputFormat::RawMd => document.content.clone(),
        OutputFormat::ToonMd => format!(
            "---\n{}\n---\n{}",
            toon::encode_object(&document.metadata),
            document.content
        ),
        OutputFormat::JsonMd => {
            let mut envelope = Map::new();
            envelope.insert(
                "metadata".to_string(),
                Value::Object(document.metadata.clone()),
            );
            envelope.insert(
                "content_raw".to_string(),
                Value::String(document.content.clone()),
            );
            pretty(&Value::Object(envelope))
        }
        OutputFormat::Json => {
            let mut flat = document.metadata.clone();
            flat.insert(
                "content_structured".to_string(),
                Value::String(document.content.clone()),
            );
            pretty(&Value::Object(flat))
        }
    }
}

/// Size of an encoded output, as reported by the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodedSize {
    /// Number of characters.
    pub chars: usize,
    /// Estimated token count (one token per four characters, rounded up).
    pub tokens_est: usize,
}

impl EncodedSize {
    /// Measures an encoded string.
    #[must_use]
    pub fn of(encoded: &str) -> Self {
        let chars = encoded.chars().count();
        Self {
            chars,
            tokens_est: chars.div_ceil(4),
        }
    }
}

/// Pretty-prints a JSON value with two-space indentation.
///
/// Serialising a `Value` into a `String` cannot fail, so the fallback is the
/// compact form and is never taken in practice.
#[must_use]
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        let Value::Object(metadata) = json!({
            "id": "guide.md",
            "type": "blueprint",
            "tags": ["ui", "design-system"],
        }) else {
            unreachable!()
        };
        Document::new(metadata, "# Guide\n\nBody text.")
    }

    #[test]
    fn raw_md_is_identity_on_content() {
        let doc = sample();
        assert_eq!(encode(&doc, OutputFormat::RawMd), doc.content);
    }

    #[test]
    fn toon_md_fences_metadata() {
        let out = encode(&sample(), OutputFormat::ToonMd);
        assert_eq!(
            out,
            "---\nid: \"guide.md\"\ntype: \"blueprint\"\ntags: [\"ui\",\"design-system\"]\n---\n# Guide\n\nBody text."
        );
    }

    #[test]
    fn json_md_wraps_raw_content() {
        let out = encode(&sample(), OutputFormat::JsonMd);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["metadata"]["type"], "blueprint");
        assert_eq!(parsed["content_raw"], "# Guide\n\nBody text.");
        assert!(out.starts_with("{\n  \"metadata\""));
    }

    #[test]
    fn json_spreads_metadata() {
        let out = encode(&sample(), OutputFormat::Json);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["id"], "guide.md");
        assert_eq!(parsed["content_structured"], "# Guide\n\nBody text.");
        assert!(parsed.get("metadata").is_none());
    }

    #[test]
    fn json_overwrites_existing_content_field_in_place() {
        let Value::Object(metadata) = json!({"content_structured": "old", "id": "x"}) else {
            unreachable!()
        };
        let out = encode(&Document::new(metadata, "new"), OutputFormat::Json);
        assert!(out.find("content_structured").unwrap() < out.find("\"id\"").unwrap());
        assert!(out.contains("\"new\""));
        assert!(!out.contains("\"old\""));
    }

    #[test]
    fn every_codec_is_deterministic() {
        let doc = sample();
        for format in OutputFormat::BENCHMARK_ORDER {
            assert_eq!(encode(&doc, format), encode(&doc, format), "{format}");
        }
    }

    #[test]
    fn format_names_round_trip() {
        for format in OutputFormat::BENCHMARK_ORDER {
            assert_eq!(format.as_str().parse::<OutputFormat>(), Ok(format));
        }
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn encoded_size_counts_characters() {
        assert_eq!(EncodedSize::of("abcde"), EncodedSize { chars: 5, tokens_est: 2 });
        assert_eq!(EncodedSize::of("é"), EncodedSize { chars: 1, tokens_est: 1 });
        assert_eq!(EncodedSize::of(""), EncodedSize { chars: 0, tokens_est: 0 });
    }
}
