// File: src/value.rs
// Purpose: Record attribute values and uploaded files

use rusty_forms_validation::Presence;
use serde::{Serialize, Serializer};

/// A file part from a multipart body, fully read into memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    pub original_filename: String,
    pub content_type: String,
    #[serde(serialize_with = "serialize_size", rename = "size")]
    pub data: Vec<u8>,
}

fn serialize_size<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(data.len() as u64)
}

impl UploadedFile {
    pub fn new(
        original_filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            original_filename: original_filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Current value of a form field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    File(UploadedFile),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            Value::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text items of a list (or the text itself), skipping anything else
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Value::Text(s) => vec![s.as_str()],
            Value::List(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Appends to a list, turning a scalar into a one-element list first
    pub fn push(&mut self, item: Value) {
        match self {
            Value::List(items) => items.push(item),
            Value::Null => *self = Value::List(vec![item]),
            other => {
                let first = std::mem::take(other);
                *other = Value::List(vec![first, item]);
            }
        }
    }

    pub(crate) fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            serde_json::Value::Number(n) => Value::Text(n.to_string()),
            other @ serde_json::Value::Object(_) => Value::Text(other.to_string()),
        }
    }
}

impl Presence for Value {
    fn is_present(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Text(s) => s.is_present(),
            Value::File(_) => true,
            Value::List(items) => !items.is_empty(),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<UploadedFile> for Value {
    fn from(file: UploadedFile) -> Self {
        Value::File(file)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_presence() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("  ").is_blank());
        assert!(Value::List(vec![]).is_blank());
        assert!(Value::from("x").is_present());
        assert!(Value::from(UploadedFile::new("a.txt", "text/plain", Vec::new())).is_present());
    }

    #[test]
    fn test_push_promotes_to_list() {
        let mut value = Value::Null;
        value.push("black".into());
        value.push("white".into());
        assert_eq!(value, Value::from(vec!["black", "white"]));

        let mut scalar = Value::from("one");
        scalar.push("two".into());
        assert_eq!(scalar.texts(), vec!["one", "two"]);
    }

    #[test]
    fn test_serializes_untagged() {
        let value = Value::List(vec![
            Value::from("a"),
            Value::Null,
            Value::from(UploadedFile::new("a.txt", "text/plain", b"hello".to_vec())),
        ]);

        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            serde_json::json!([
                "a",
                null,
                {"original_filename": "a.txt", "content_type": "text/plain", "size": 5}
            ])
        );
    }

    #[test]
    fn test_from_json_stringifies_scalars() {
        let value = Value::from_json(serde_json::json!(["x", 3, true, null]));
        assert_eq!(
            value,
            Value::List(vec!["x".into(), "3".into(), "true".into(), Value::Null])
        );
    }
}
