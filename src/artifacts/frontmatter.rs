//! Minimal frontmatter handling for component specs.
//!
//! Specs may start with a block delimited by `---` lines. Only flat
//! `key: value` lines are understood; anything else in the block is ignored.

use serde_json::{Map, Value};

const FENCE: &str = "---";

/// Splits a document into its frontmatter block and body.
///
/// Fences may end in `\n` or `\r\n`, and the closing fence may be the last
/// line of the file. Returns `None` when the document does not open with a
/// closed `---` block.
#[must_use]
pub fn split(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FENCE {
            let block = &rest[..offset];
            let block = block.strip_suffix('\n').unwrap_or(block);
            let block = block.strip_suffix('\r').unwrap_or(block);
            return Some((block, &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parses flat `key: value` lines into an ordered map of strings.
///
/// The key is the text before the first colon; the value is the rest,
/// trimmed, with one pair of surrounding quotes removed.
#[must_use]
pub fn parse_fields(block: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(
            key.to_string(),
            Value::String(unquote(value.trim()).to_string()),
        );
    }
    fields
}

/// Parses the frontmatter of a document, if it has one.
#[must_use]
pub fn parse(content: &str) -> Option<Map<String, Value>> {
    split(content).map(|(block, _)| parse_fields(block))
}

/// Removes the frontmatter block and trims the remaining body.
#[must_use]
pub fn strip(content: &str) -> &str {
    split(content).map_or(content, |(_, body)| body).trim()
}

fn unquote(value: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if is_quote(first) && is_quote(last) => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = "---\nname: Button\nstatus: \"stable\"\nurl: https://x.dev/a\n---\n# Button\n\nBody\n";

    #[test]
    fn split_separates_block_and_body() {
        let (block, body) = split(SPEC).unwrap();
        assert_eq!(block, "name: Button\nstatus: \"stable\"\nurl: https://x.dev/a");
        assert_eq!(body, "# Button\n\nBody\n");
    }

    #[test]
    fn split_requires_leading_fence() {
        assert!(split("# Button\n---\nx\n---\n").is_none());
        assert!(split("---\nunterminated\n").is_none());
    }

    #[test]
    fn split_accepts_crlf_fences() {
        let crlf = SPEC.replace('\n', "\r\n");
        let (block, body) = split(&crlf).unwrap();
        assert_eq!(block, "name: Button\r\nstatus: \"stable\"\r\nurl: https://x.dev/a");
        assert_eq!(body, "# Button\r\n\r\nBody\r\n");
        assert_eq!(parse(&crlf).unwrap()["status"], "stable");
        assert_eq!(strip(&crlf), "# Button\r\n\r\nBody");
    }

    #[test]
    fn split_accepts_closing_fence_at_eof() {
        let (block, body) = split("---\nname: Badge\n---").unwrap();
        assert_eq!(block, "name: Badge");
        assert_eq!(body, "");
        assert_eq!(parse("---\r\nname: Badge\r\n---").unwrap()["name"], "Badge");
    }

    #[test]
    fn split_ignores_longer_dash_lines() {
        let (block, body) = split("---\na: 1\n----\nb: 2\n---\nrest").unwrap();
        assert_eq!(block, "a: 1\n----\nb: 2");
        assert_eq!(body, "rest");
    }

    #[test]
    fn parse_fields_keeps_colons_in_values() {
        let fields = parse(SPEC).unwrap();
        assert_eq!(fields["name"], "Button");
        assert_eq!(fields["status"], "stable");
        assert_eq!(fields["url"], "https://x.dev/a");
        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            vec!["name", "status", "url"]
        );
    }

    #[test]
    fn parse_fields_skips_lines_without_colon() {
        let fields = parse_fields("tags\n  - ui\nkind: 'atom'");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["kind"], "atom");
    }

    #[test]
    fn strip_removes_block_and_trims() {
        assert_eq!(strip(SPEC), "# Button\n\nBody");
        assert_eq!(strip("  plain text \n"), "plain text");
    }

    #[test]
    fn unquote_leaves_single_char() {
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("'x'"), "x");
    }
}
