//! Output schema module
//!
//! A schema is plain data: an ordered list of fields, each with a type, a
//! description and an optional closed set of allowed values. The same
//! description drives two pure functions:
//! - [`format_instructions`] renders it into text for the model prompt
//! - [`validate`] checks a parsed JSON value against it
//!
//! [`parse`] ties them to the raw model text.

pub mod task;

pub use task::{EffortScore, SuggestionList, TaskAnalysis, SUGGESTION_LIST, TASK_ANALYSIS};

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// JSON type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Boolean,
    /// Array of strings with an exact item count
    StringList { len: usize },
}

impl FieldType {
    const fn describe(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Boolean => "a boolean",
            Self::StringList { .. } => "an array of strings",
        }
    }
}

/// One field of an output schema
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldType,
    pub description: &'static str,
    /// Closed set of allowed string values
    pub allowed: Option<&'static [&'static str]>,
    /// Strings (or list items) must not be empty
    pub non_empty: bool,
}

impl Field {
    pub const fn new(name: &'static str, kind: FieldType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            allowed: None,
            non_empty: false,
        }
    }

    #[must_use]
    pub const fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    #[must_use]
    pub const fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    fn to_json_schema(self) -> Value {
        let mut property = match self.kind {
            FieldType::String => json!({ "type": "string" }),
            FieldType::Boolean => json!({ "type": "boolean" }),
            FieldType::StringList { len } => json!({
                "type": "array",
                "items": { "type": "string" },
                "minItems": len,
                "maxItems": len,
            }),
        };
        if let Value::Object(map) = &mut property {
            map.insert("description".to_string(), json!(self.description));
            if let Some(allowed) = self.allowed {
                map.insert("enum".to_string(), json!(allowed));
            }
        }
        property
    }
}

/// A flat object schema
#[derive(Debug)]
pub struct Schema {
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [Field],
}

/// Ways a model response can fail to match its schema
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("output is not valid JSON: {0}")]
    NotJson(String),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unexpected field `{0}`")]
    UnexpectedField(String),

    #[error("field `{field}` should be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{0}` must not be empty")]
    Empty(&'static str),

    #[error("field `{field}` is `{value}`, expected one of {allowed:?}")]
    NotAllowed {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("field `{field}` should hold {expected} items, got {actual}")]
    WrongLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Render the schema into model instructions.
///
/// Output is deterministic: properties appear in declaration order and
/// identical schemas always produce identical text.
pub fn format_instructions(schema: &Schema) -> String {
    let properties: Vec<String> = schema
        .fields
        .iter()
        .map(|field| format!("{}:{}", json!(field.name), field.to_json_schema()))
        .collect();
    let required: Vec<&str> = schema.fields.iter().map(|f| f.name).collect();

    let rendered = format!(
        r#"{{"title":{},"description":{},"type":"object","properties":{{{}}},"required":{},"additionalProperties":false}}"#,
        json!(schema.title),
        json!(schema.description),
        properties.join(","),
        json!(required),
    );

    format!(
        "The output must be a single JSON object that conforms to the JSON schema below. \
         Respond with the JSON object ONLY: no markdown, no code fences, no commentary. \
         Include every required property and no others.\n\
         \n\
         Here is the output schema:\n\
         ```\n\
         {rendered}\n\
         ```"
    )
}

/// Check a parsed value against the schema.
///
/// Strict: unknown fields are rejected as well as missing ones.
pub fn validate(schema: &Schema, value: &Value) -> Result<(), SchemaViolation> {
    let object = value
        .as_object()
        .ok_or_else(|| SchemaViolation::NotAnObject(json_kind(value)))?;

    for field in schema.fields {
        let found = object
            .get(field.name)
            .ok_or(SchemaViolation::MissingField(field.name))?;
        validate_field(field, found)?;
    }

    if let Some(extra) = first_unknown_key(schema, object) {
        return Err(SchemaViolation::UnexpectedField(extra.clone()));
    }
    Ok(())
}

/// Parse raw model text into `T`, validating against `schema` first
pub fn parse<T: DeserializeOwned>(schema: &Schema, raw: &str) -> Result<T, SchemaViolation> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| SchemaViolation::NotJson(e.to_string()))?;
    validate(schema, &value)?;
    serde_json::from_value(value).map_err(|e| SchemaViolation::NotJson(e.to_string()))
}

/// Models often wrap JSON in a markdown fence even when told not to
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Info string (e.g. "json"), which may share a line with the payload
    let body = rest
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
        .trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn validate_field(field: &Field, value: &Value) -> Result<(), SchemaViolation> {
    let wrong_type = || SchemaViolation::WrongType {
        field: field.name,
        expected: field.kind.describe(),
    };

    match field.kind {
        FieldType::Boolean => {
            value.as_bool().ok_or_else(wrong_type)?;
        }
        FieldType::String => {
            let text = value.as_str().ok_or_else(wrong_type)?;
            check_text(field, text)?;
        }
        FieldType::StringList { len } => {
            let items = value.as_array().ok_or_else(wrong_type)?;
            if items.len() != len {
                return Err(SchemaViolation::WrongLength {
                    field: field.name,
                    expected: len,
                    actual: items.len(),
                });
            }
            for item in items {
                let text = item.as_str().ok_or_else(wrong_type)?;
                check_text(field, text)?;
            }
        }
    }
    Ok(())
}

fn check_text(field: &Field, text: &str) -> Result<(), SchemaViolation> {
    if field.non_empty && text.trim().is_empty() {
        return Err(SchemaViolation::Empty(field.name));
    }
    if let Some(allowed) = field.allowed {
        if !allowed.contains(&text) {
            return Err(SchemaViolation::NotAllowed {
                field: field.name,
                value: text.to_string(),
                allowed,
            });
        }
    }
    Ok(())
}

fn first_unknown_key<'a>(schema: &Schema, object: &'a Map<String, Value>) -> Option<&'a String> {
    object
        .keys()
        .find(|key| !schema.fields.iter().any(|f| f.name == key.as_str()))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
