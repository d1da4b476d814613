//! Declarative tool input schemas.
//!
//! A schema is a flat list of named fields. The same declaration is exported
//! as JSON Schema for `tools/list` and used to validate `tools/call`
//! arguments before a handler runs.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// JSON Schema dialect advertised in exported schemas.
const JSON_SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

/// Pattern advertised for file-name fields.
const FILE_NAME_PATTERN: &str = r"^(?!\.{1,2}$)[^/\\]+$";

/// The JSON type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A JSON string.
    String,
    /// A JSON boolean.
    Boolean,
    /// A JSON object with arbitrary members.
    Object,
}

impl FieldType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }

    const fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::String, Value::String(_))
                | (Self::Boolean, Value::Bool(_))
                | (Self::Object, Value::Object(_))
        )
    }
}

/// One declared argument.
#[derive(Debug, Clone)]
pub struct Field {
    name: &'static str,
    field_type: FieldType,
    description: &'static str,
    required: bool,
    choices: &'static [&'static str],
    default: Option<Value>,
    min_length: Option<usize>,
    file_name: bool,
}

impl Field {
    const fn new(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            description,
            required: true,
            choices: &[],
            default: None,
            min_length: None,
            file_name: false,
        }
    }

    /// A required string field.
    #[must_use]
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::String, description)
    }

    /// A required boolean field.
    #[must_use]
    pub const fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::Boolean, description)
    }

    /// A required object field.
    #[must_use]
    pub const fn object(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::Object, description)
    }

    /// Marks the field as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Restricts a string field to a fixed set of values.
    #[must_use]
    pub fn one_of(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    /// Advertises a default for an optional field.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Requires a string of at least `min` characters.
    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Requires a string usable as a single path component.
    #[must_use]
    pub fn file_name(mut self) -> Self {
        self.file_name = true;
        self
    }

    /// The field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    fn to_json_schema(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".into(), json!(self.field_type.as_str()));
        property.insert("description".into(), json!(self.description));
        if !self.choices.is_empty() {
            property.insert("enum".into(), json!(self.choices));
        }
        if let Some(default) = &self.default {
            property.insert("default".into(), default.clone());
        }
        if let Some(min) = self.min_length {
            property.insert("minLength".into(), json!(min));
        }
        if self.file_name {
            property.insert("pattern".into(), json!(FILE_NAME_PATTERN));
        }
        Value::Object(property)
    }

    fn check(&self, value: &Value) -> Option<String> {
        if !self.field_type.accepts(value) {
            return Some(format!(
                "expected {}, got {}",
                self.field_type.as_str(),
                json_type_name(value)
            ));
        }

        let Value::String(text) = value else {
            return None;
        };

        if !self.choices.is_empty() && !self.choices.contains(&text.as_str()) {
            return Some(format!(
                "must be one of: {}",
                self.choices.join(", ")
            ));
        }
        if let Some(min) = self.min_length {
            if text.chars().count() < min {
                return Some(format!("must be at least {min} character(s) long"));
            }
        }
        if self.file_name && !is_file_name(text) {
            return Some("must be a file name without path separators".to_string());
        }
        None
    }
}

/// A tool's declared arguments.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    fields: Vec<Field>,
}

impl InputSchema {
    /// A schema over the given fields, in declaration order.
    #[must_use]
    pub const fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// A schema that accepts only an empty argument object.
    #[must_use]
    pub const fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    /// The declared fields.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Exports the schema as a JSON Schema (draft-07) object.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();

        json!({
            "$schema": JSON_SCHEMA_DRAFT,
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    /// Validates raw call arguments.
    ///
    /// `null` stands for "no arguments". Every violation is collected so the
    /// caller can report them together.
    ///
    /// # Errors
    ///
    /// Returns the list of violations when any field is missing, unknown or
    /// ill-typed.
    pub fn validate(&self, raw: &Value) -> Result<Arguments, Vec<FieldViolation>> {
        let values = match raw {
            Value::Null => Map::new(),
            Value::Object(map) => map.clone(),
            other => {
                return Err(vec![FieldViolation::new(
                    "arguments",
                    format!("expected object, got {}", json_type_name(other)),
                )])
            }
        };

        let mut violations = Vec::new();

        for key in values.keys() {
            if !self.fields.iter().any(|f| f.name == key.as_str()) {
                violations.push(FieldViolation::new(key, "unknown field"));
            }
        }

        for field in &self.fields {
            match values.get(field.name) {
                None if field.required => {
                    violations.push(FieldViolation::new(field.name, "required field missing"));
                }
                None => {}
                Some(value) => {
                    if let Some(message) = field.check(value) {
                        violations.push(FieldViolation::new(field.name, message));
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(Arguments(values))
        } else {
            Err(violations)
        }
    }
}

/// A single argument that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// The offending field.
    pub field: String,
    /// What was wrong with it.
    pub message: String,
}

impl FieldViolation {
    /// Creates a violation for `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Arguments that passed schema validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Deserialises the arguments into a handler's parameter struct.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the struct disagrees with the schema.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0))
    }

    /// Raw access to one argument.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

fn is_file_name(text: &str) -> bool {
    !text.is_empty() && text != "." && text != ".." && !text.contains(['/', '\\'])
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
