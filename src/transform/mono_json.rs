//! Markdown to nested JSON conversion.

use serde_json::{Map, Value};

const INTRO_SECTION: &str = "intro";

/// Splits markdown into sections keyed by top-level heading text.
///
/// Lines before the first `# ` heading go to `intro`. `## ` headings are
/// ordinary lines of the current section. A section is emitted only if it
/// collected at least one line; its text is trimmed. A repeated heading
/// replaces the earlier section in place.
#[must_use]
pub fn split_sections(content: &str) -> Map<String, Value> {
    let mut sections = Map::new();
    let mut current = INTRO_SECTION.to_string();
    let mut buffer: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        if let Some(heading) = line.strip_prefix("# ") {
            if !buffer.is_empty() {
                sections.insert(current, Value::String(buffer.join("\n").trim().to_string()));
            }
            current = heading.trim().to_string();
            buffer.clear();
        } else {
            buffer.push(line);
        }
    }
    if !buffer.is_empty() {
        sections.insert(current, Value::String(buffer.join("\n").trim().to_string()));
    }

    sections
}

/// Builds the `{raw_content, sections}` document for a spec.
#[must_use]
pub fn transform_spec(content: &str) -> Value {
    let mut doc = Map::new();
    doc.insert("raw_content".to_string(), Value::String(content.to_string()));
    doc.insert("sections".to_string(), Value::Object(split_sections(content)));
    Value::Object(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sections_follow_top_level_headings() {
        let md = "lead-in\n# Button\nA button.\n## Props\n- size\n# Usage\n\nUse it.\n";
        assert_eq!(
            Value::Object(split_sections(md)),
            json!({
                "intro": "lead-in",
                "Button": "A button.\n## Props\n- size",
                "Usage": "Use it."
            })
        );
    }

    #[test]
    fn heading_on_first_line_has_no_intro() {
        let sections = split_sections("# Card\nBody");
        assert!(!sections.contains_key("intro"));
        assert_eq!(sections["Card"], "Body");
    }

    #[test]
    fn trailing_heading_without_lines_is_dropped() {
        let sections = split_sections("# A\nx\n# B");
        assert_eq!(sections.keys().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn document_keeps_raw_content() {
        let doc = transform_spec("# T\nbody");
        assert_eq!(doc["raw_content"], "# T\nbody");
        assert_eq!(doc["sections"]["T"], "body");
    }
}
