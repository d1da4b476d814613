//! Frontmatter stripping and token tables.

use serde_json::Value;

use crate::artifacts::frontmatter;

/// Removes the frontmatter block from a spec and trims the body.
#[must_use]
pub fn transform_spec(content: &str) -> String {
    frontmatter::strip(content).to_string()
}

/// Flattens a token file into a markdown table headed `# <category> Tokens`.
///
/// Objects carrying `$value` (or a plain `value`) become one row; other
/// objects are walked with dotted paths; any other value is a row on its own.
#[must_use]
pub fn tokens_table(category: &str, tokens: &Value) -> String {
    let mut rows = Vec::new();
    collect_rows(tokens, "", &mut rows);

    let mut md = format!("# {category} Tokens\n\n| Token | Value |\n|-------|-------|\n");
    for (token, value) in rows {
        md.push_str(&format!("| `{}` | `{}` |\n", escape(&token), escape(&value)));
    }
    md
}

fn collect_rows(node: &Value, prefix: &str, rows: &mut Vec<(String, String)>) {
    let Value::Object(map) = node else {
        rows.push((prefix.to_string(), cell(node)));
        return;
    };

    if let Some(value) = map.get("$value").or_else(|| map.get("value")) {
        rows.push((prefix.to_string(), cell(value)));
        return;
    }

    for (key, child) in map {
        if key.starts_with('$') {
            continue;
        }
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        collect_rows(child, &path, rows);
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_frontmatter() {
        assert_eq!(
            transform_spec("---\nname: Card\n---\n\n# Card\n\nBody\n"),
            "# Card\n\nBody"
        );
    }

    #[test]
    fn table_flattens_token_tree() {
        let tokens = json!({
            "$schema": "https://example.test/schema.json",
            "color": {
                "primary": {"$value": "#4DA3FF", "$type": "color"},
                "legacy": {"value": "#000"},
                "stack": ["a|b", 2]
            },
            "unit": 4
        });
        assert_eq!(
            tokens_table("colors", &tokens),
            "# colors Tokens\n\n| Token | Value |\n|-------|-------|\n\
             | `color.primary` | `#4DA3FF` |\n\
             | `color.legacy` | `#000` |\n\
             | `color.stack` | `[\"a\\|b\",2]` |\n\
             | `unit` | `4` |\n"
        );
    }

    #[test]
    fn empty_tree_has_only_header() {
        assert_eq!(
            tokens_table("radius", &json!({})),
            "# radius Tokens\n\n| Token | Value |\n|-------|-------|\n"
        );
    }
}
