// File: src/errors.rs
// Purpose: Structural parse errors and accumulated validation errors

use std::collections::HashMap;
use std::fmt;

/// Errors that abort a parse (or a schema declaration) outright.
///
/// These signal that the payload or the schema is wrong, not that the user
/// typed something invalid. Validation feedback lives in [`Errors`].
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("missing form key: {0}")]
    MissingKey(String),

    #[error("multiple values for {0} field")]
    DuplicateValue(String),

    #[error("unexpected form keys: {}", .0.join(", "))]
    UnexpectedKeys(Vec<String>),

    #[error("can't parse {0} form data")]
    UnsupportedInput(String),

    #[error("malformed form data: {0}")]
    Malformed(String),

    #[error("invalid form schema: {0}")]
    Schema(String),

    #[error("unknown condition: {0}")]
    UnknownCondition(String),

    #[error("can't fill form: {0}")]
    Fill(#[from] serde_json::Error),
}

impl FormError {
    /// Key/cardinality mismatches between the payload and the schema
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            FormError::MissingKey(_) | FormError::DuplicateValue(_) | FormError::UnexpectedKeys(_)
        )
    }
}

/// One validation failure.
///
/// Field errors display as `"<Label> <message>"`, form-level errors as the
/// bare message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    field: Option<String>,
    label: String,
    message: String,
}

impl ValidationError {
    pub fn on_field(field: impl Into<String>, label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            label: label.into(),
            message: message.into(),
        }
    }

    pub fn on_form(message: impl Into<String>) -> Self {
        Self {
            field: None,
            label: String::new(),
            message: message.into(),
        }
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(_) => write!(f, "{} {}", self.label, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Append-only, ordered list of validation errors with a per-field index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    entries: Vec<ValidationError>,
    by_field: HashMap<String, Vec<usize>>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        if let Some(field) = error.field_name() {
            self.by_field
                .entry(field.to_string())
                .or_default()
                .push(self.entries.len());
        }
        self.entries.push(error);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.entries.iter()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.entries.first()
    }

    pub fn get(&self, index: usize) -> Option<&ValidationError> {
        self.entries.get(index)
    }

    /// Errors recorded against `field`, in the order they were added
    pub fn on(&self, field: &str) -> Vec<&ValidationError> {
        self.by_field
            .get(field)
            .map(|indices| indices.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    pub fn has_errors_on(&self, field: &str) -> bool {
        self.by_field.contains_key(field)
    }

    /// Display strings of every error, in order
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_field.clear();
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
