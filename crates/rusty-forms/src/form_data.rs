// File: src/form_data.rs
// Purpose: Decoded form input (key -> list of values) and the conversions into it

use crate::errors::FormError;
use crate::request::FormRequest;
use crate::value::UploadedFile;
use std::collections::HashMap;

/// One decoded input value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(UploadedFile),
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

impl From<UploadedFile> for FormValue {
    fn from(file: UploadedFile) -> Self {
        FormValue::File(file)
    }
}

/// Form input as a map of keys to every value submitted under that key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: HashMap<String, Vec<FormValue>>,
}

impl FormData {
    /// Create empty form data
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs, keeping repeated keys in order
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FormValue>,
    {
        let mut data = Self::new();
        for (key, value) in pairs {
            data.append(key, value);
        }
        data
    }

    /// Decode an `application/x-www-form-urlencoded` string
    pub fn from_urlencoded(input: &str) -> Result<Self, FormError> {
        let mut data = Self::new();

        for pair in input.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(key)?;
            if key.is_empty() {
                continue;
            }
            data.append(key, decode_component(value)?);
        }

        Ok(data)
    }

    /// Add a value under `key`
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<FormValue>) {
        self.fields.entry(key.into()).or_default().push(value.into());
    }

    /// Make sure `key` exists, even with no values
    pub fn touch(&mut self, key: impl Into<String>) {
        self.fields.entry(key.into()).or_default();
    }

    pub fn get(&self, key: &str) -> Option<&[FormValue]> {
        self.fields.get(key).map(Vec::as_slice)
    }

    /// Take every value for `key` out of the map
    pub fn remove(&mut self, key: &str) -> Option<Vec<FormValue>> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// All remaining keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.fields.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn decode_component(raw: &str) -> Result<String, FormError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| FormError::Malformed(e.to_string()))
}

/// Anything `parse` accepts as input
pub trait IntoFormData {
    fn into_form_data(self) -> Result<FormData, FormError>;
}

impl IntoFormData for FormData {
    fn into_form_data(self) -> Result<FormData, FormError> {
        Ok(self)
    }
}

impl IntoFormData for &str {
    fn into_form_data(self) -> Result<FormData, FormError> {
        FormData::from_urlencoded(self)
    }
}

impl IntoFormData for String {
    fn into_form_data(self) -> Result<FormData, FormError> {
        FormData::from_urlencoded(&self)
    }
}

impl IntoFormData for &String {
    fn into_form_data(self) -> Result<FormData, FormError> {
        FormData::from_urlencoded(self)
    }
}

impl IntoFormData for &FormRequest {
    fn into_form_data(self) -> Result<FormData, FormError> {
        if let Some(data) = self.multipart_data() {
            return Ok(data.clone());
        }

        match self.media_type().as_deref() {
            Some("application/x-www-form-urlencoded") => {
                let body = std::str::from_utf8(self.body())
                    .map_err(|e| FormError::Malformed(e.to_string()))?;
                FormData::from_urlencoded(body)
            }
            // multipart parts are only decoded by FormRequest::read or the extractor
            Some("multipart/form-data") => Err(FormError::UnsupportedInput(
                "unread multipart/form-data".to_string(),
            )),
            Some(other) => Err(FormError::UnsupportedInput(format!("{other:?}"))),
            None => Err(FormError::UnsupportedInput("untyped request".to_string())),
        }
    }
}

impl IntoFormData for FormRequest {
    fn into_form_data(self) -> Result<FormData, FormError> {
        match self.into_multipart_data() {
            Ok(data) => Ok(data),
            Err(request) => (&request).into_form_data(),
        }
    }
}

impl IntoFormData for HashMap<String, String> {
    fn into_form_data(self) -> Result<FormData, FormError> {
        Ok(FormData::from_pairs(self))
    }
}

impl IntoFormData for HashMap<String, Vec<String>> {
    fn into_form_data(self) -> Result<FormData, FormError> {
        let fields = self
            .into_iter()
            .map(|(key, values)| (key, values.into_iter().map(FormValue::Text).collect()))
            .collect();
        Ok(FormData { fields })
    }
}

impl IntoFormData for serde_json::Value {
    fn into_form_data(self) -> Result<FormData, FormError> {
        let serde_json::Value::Object(object) = self else {
            return Err(FormError::UnsupportedInput(json_kind(&self).to_string()));
        };

        let mut data = FormData::new();
        for (key, value) in object {
            data.touch(key.clone());
            match value {
                serde_json::Value::Array(items) => {
                    for item in items {
                        data.append(key.clone(), json_text(item)?);
                    }
                }
                other => data.append(key, json_text(other)?),
            }
        }
        Ok(data)
    }
}

fn json_text(value: serde_json::Value) -> Result<String, FormError> {
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(FormError::UnsupportedInput(format!("nested {}", json_kind(&other)))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
