//! Frontmatter to toon header conversion.

use serde_json::Value;

use crate::artifacts::frontmatter;
use crate::codec::toon;

/// Replaces a spec's `---` frontmatter with a `+++` toon block.
///
/// Specs without frontmatter are returned unchanged.
#[must_use]
pub fn transform_spec(content: &str) -> String {
    match frontmatter::split(content) {
        Some((block, body)) => {
            let header = toon::encode_object(&frontmatter::parse_fields(block));
            format!("+++\n{header}\n+++\n{body}")
        }
        None => content.to_string(),
    }
}

/// Encodes a token file in toon notation.
#[must_use]
pub fn transform_tokens(tokens: &Value) -> String {
    toon::encode(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn frontmatter_becomes_toon_block() {
        let spec = "---\nname: Button\nstatus: 'beta'\n---\n# Button\nBody\n";
        assert_eq!(
            transform_spec(spec),
            "+++\nname: \"Button\"\nstatus: \"beta\"\n+++\n# Button\nBody\n"
        );
    }

    #[test]
    fn spec_without_frontmatter_is_copied() {
        assert_eq!(transform_spec("# Card\n"), "# Card\n");
    }

    #[test]
    fn tokens_are_toon_encoded() {
        let tokens = json!({"radius": {"sm": {"$value": "4px"}}});
        assert_eq!(
            transform_tokens(&tokens),
            "radius: {\"sm\":{\"$value\":\"4px\"}}"
        );
    }
}
