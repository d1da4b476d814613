//! `validate_component_usage`: guideline checks over JSX snippets.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::codegen::PACKAGE;
use super::{Arguments, Field, HandlerFuture, InputSchema, ToolDefinition, ToolError};
use crate::artifacts::Artifacts;

const BUTTON_VARIANTS: [&str; 4] = ["primary", "secondary", "danger", "ghost"];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition {
        name: "validate_component_usage",
        description: "Validate component usage against design system guidelines and best practices",
        schema: InputSchema::new(vec![Field::string("code", "Component code to validate")]),
        handler: validate_component_usage,
    }]
}

#[derive(Deserialize)]
struct Params {
    code: String,
}

/// Extra condition applied to each match of a rule's pattern.
#[derive(Debug, Clone, Copy)]
enum Guard {
    /// Any match is a violation.
    Always,
    /// The text after the match must not start with a Button variant.
    NotVariant,
    /// The tag must not carry `alt=` before its closing `>`.
    MissingAlt,
}

struct Rule {
    pattern: &'static str,
    guard: Guard,
    component: &'static str,
    message: &'static str,
}

static RULES: [Rule; 4] = [
    Rule {
        pattern: r#"color\s*=\s*["']"#,
        guard: Guard::NotVariant,
        component: "Button",
        message: "Use 'variant' prop instead of 'color'. Valid variants: primary, secondary, danger, ghost",
    },
    Rule {
        pattern: r"<Button[^>]*>\s*</Button>",
        guard: Guard::Always,
        component: "Button",
        message: "Button should have children or an aria-label for accessibility",
    },
    Rule {
        pattern: r"(?i)<img",
        guard: Guard::MissingAlt,
        component: "Image",
        message: "Images must have an 'alt' attribute for accessibility",
    },
    Rule {
        pattern: r"onClick.*href",
        guard: Guard::Always,
        component: "Link",
        message: "Don't use onClick with href. Use Button for actions, Link for navigation",
    },
];

/// A guideline violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageError {
    /// The component the rule is about.
    pub component: &'static str,
    /// What to change.
    pub message: &'static str,
    /// Always `error`.
    pub severity: &'static str,
}

/// A non-blocking finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageWarning {
    /// What to change.
    pub message: String,
    /// Always `warning`.
    pub severity: &'static str,
}

/// Outcome of validating one snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageReport {
    /// `true` when no errors were found.
    pub valid: bool,
    /// Rule violations.
    pub errors: Vec<UsageError>,
    /// Warnings.
    pub warnings: Vec<UsageWarning>,
    /// One-line summary.
    pub summary: String,
}

/// Compiled guideline rules.
pub struct UsageValidator {
    rules: Vec<(Regex, &'static Rule)>,
    component_tag: Regex,
}

impl UsageValidator {
    /// Compiles the rule set.
    ///
    /// # Errors
    ///
    /// Returns the regex error if a pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let rules = RULES
            .iter()
            .map(|rule| Regex::new(rule.pattern).map(|re| (re, rule)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rules,
            component_tag: Regex::new(r"<([A-Z][a-zA-Z]*)")?,
        })
    }

    /// Checks a snippet against every rule.
    #[must_use]
    pub fn validate(&self, code: &str) -> UsageReport {
        let errors: Vec<UsageError> = self
            .rules
            .iter()
            .filter(|(re, rule)| violates(re, rule.guard, code))
            .map(|(_, rule)| UsageError {
                component: rule.component,
                message: rule.message,
                severity: "error",
            })
            .collect();

        let mut warnings = Vec::new();
        let components = self.components_used(code);
        if !components.is_empty() && !code.contains("import") {
            warnings.push(UsageWarning {
                message: format!(
                    "Missing import statement. Add: import {{ {} }} from '{PACKAGE}';",
                    components.join(", ")
                ),
                severity: "warning",
            });
        }

        let valid = errors.is_empty();
        let summary = if valid {
            "✅ Code follows design system guidelines".to_string()
        } else {
            format!(
                "❌ Found {} error(s) and {} warning(s)",
                errors.len(),
                warnings.len()
            )
        };

        UsageReport {
            valid,
            errors,
            warnings,
            summary,
        }
    }

    /// Capitalised JSX tags, unique, in first-seen order.
    fn components_used<'c>(&self, code: &'c str) -> Vec<&'c str> {
        let mut seen: Vec<&str> = Vec::new();
        for captures in self.component_tag.captures_iter(code) {
            if let Some(name) = captures.get(1).map(|m| m.as_str()) {
                if !seen.contains(&name) {
                    seen.push(name);
                }
            }
        }
        seen
    }
}

fn violates(re: &Regex, guard: Guard, code: &str) -> bool {
    match guard {
        Guard::Always => re.is_match(code),
        Guard::NotVariant => re.find_iter(code).any(|m| {
            let rest = &code[m.end()..];
            !BUTTON_VARIANTS.iter().any(|v| rest.starts_with(v))
        }),
        Guard::MissingAlt => re.find_iter(code).any(|m| {
            let rest = &code[m.end()..];
            let tag = rest.find('>').map_or(rest, |end| &rest[..end]);
            !tag.to_lowercase().contains("alt=")
        }),
    }
}

/// The compiled rule set, built on first use.
fn shared_validator() -> Result<&'static UsageValidator, ToolError> {
    static VALIDATOR: OnceLock<UsageValidator> = OnceLock::new();
    if let Some(validator) = VALIDATOR.get() {
        return Ok(validator);
    }
    let validator = UsageValidator::new().map_err(|e| ToolError::Execution(e.to_string()))?;
    Ok(VALIDATOR.get_or_init(|| validator))
}

fn validate_component_usage(_artifacts: &Artifacts, args: Arguments) -> HandlerFuture<'_> {
    Box::pin(async move {
        let Params { code } = args.parse()?;
        let report = shared_validator()?.validate(&code);
        tracing::debug!(valid = report.valid, errors = report.errors.len(), "Validated component usage");
        Ok(serde_json::to_value(report)?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(code: &str) -> UsageReport {
        shared_validator().unwrap().validate(code)
    }

    fn messages(report: &UsageReport) -> Vec<&str> {
        report.errors.iter().map(|e| e.message).collect()
    }

    #[test]
    fn clean_code_passes() {
        let report = validate(
            "import { Button } from '@unmessme/design-system';\n<Button variant=\"primary\">Save</Button>",
        );
        assert!(report.valid);
        assert!(report.warnings.is_empty());
        assert_eq!(report.summary, "✅ Code follows design system guidelines");
    }

    #[test]
    fn color_prop_must_be_a_variant() {
        assert!(validate("import x;\n<Button color=\"primary\">Go</Button>").valid);
        let report = validate("import x;\n<Button color='red'>Go</Button>");
        assert_eq!(messages(&report), vec![RULES[0].message]);
    }

    #[test]
    fn empty_button_is_flagged() {
        let report = validate("import x;\n<Button variant=\"ghost\">  \n</Button>");
        assert_eq!(messages(&report), vec![RULES[1].message]);
    }

    #[test]
    fn images_need_alt() {
        assert!(validate("import x; <IMG src=\"a.png\" ALT=\"logo\">").valid);
        let report = validate("import x; <img src=\"a.png\"> <img alt=\"b\">");
        assert_eq!(messages(&report), vec![RULES[2].message]);
    }

    #[test]
    fn onclick_with_href_on_one_line() {
        assert!(validate("import x;\n<a onClick={f}\nhref=\"/\">").valid);
        let report = validate("import x;\n<a onClick={f} href=\"/\">");
        assert_eq!(report.errors[0].component, "Link");
    }

    #[test]
    fn missing_import_warning_lists_unique_tags() {
        let report = validate("<Card><Button>Go</Button><Card /></Card>");
        assert!(report.valid);
        assert_eq!(
            report.warnings[0].message,
            "Missing import statement. Add: import { Card, Button } from '@unmessme/design-system';"
        );
    }

    #[test]
    fn summary_counts_errors_and_warnings() {
        let report = validate("<Button color=\"red\"></Button>");
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.summary, "❌ Found 2 error(s) and 1 warning(s)");
    }

    #[test]
    fn rules_compile_once() {
        let first = shared_validator().unwrap();
        let second = shared_validator().unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
