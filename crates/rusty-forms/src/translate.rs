// File: src/translate.rs
// Purpose: Label and error-message lookup with compiled-in defaults

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

pub const ERRORS_SCOPE: &[&str] = &["forms", "errors"];
pub const LABELS_SCOPE: &[&str] = &["forms", "labels"];

/// Message used for any error key without a built-in default
pub const FALLBACK_MESSAGE: &str = "is invalid";

static DEFAULT_MESSAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("bad_value", "is invalid"),
        ("invalid", "is invalid"),
        ("no_match", "is invalid"),
        ("not_accepted", "is not an accepted file type"),
        ("not_multiline", "cannot contain newlines"),
        ("required", "is required"),
        ("too_large", "is too large"),
        ("too_long", "is too long"),
        ("too_short", "is too short"),
    ])
});

/// Built-in message for an error key
pub fn default_message(key: &str) -> Option<&'static str> {
    DEFAULT_MESSAGES.get(key).copied()
}

/// Default label for a field name: `"first_name"` -> `"First name"`
pub fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// A localization backend
pub trait Translate: Send + Sync {
    /// Look up `key` under `scope`; `None` when there is no entry
    fn translate(&self, scope: &[&str], key: &str) -> Option<String>;
}

/// Dotted keys: `"forms.errors.required" => "must be filled in"`
impl Translate for HashMap<String, String> {
    fn translate(&self, scope: &[&str], key: &str) -> Option<String> {
        let mut path = scope.join(".");
        path.push('.');
        path.push_str(key);
        self.get(&path).cloned()
    }
}

/// Translation strings loaded from a TOML document of nested tables
///
/// ```toml
/// [forms.errors]
/// required = "can't be blank"
///
/// [forms.labels]
/// email = "Email address"
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    root: toml::Table,
}

impl Catalog {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let root: toml::Table = toml::from_str(content).context("Failed to parse translation catalog")?;
        Ok(Self { root })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read translation catalog: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load translation catalog: {:?}", path))
    }
}

impl Translate for Catalog {
    fn translate(&self, scope: &[&str], key: &str) -> Option<String> {
        let mut table = &self.root;
        for segment in scope {
            match table.get(*segment).and_then(toml::Value::as_table) {
                Some(next) => table = next,
                None => {
                    warn!(scope = %scope.join("."), "translation scope missing from catalog");
                    return None;
                }
            }
        }

        table.get(key).and_then(toml::Value::as_str).map(str::to_string)
    }
}

/// Resolves labels and messages, consulting an optional backend first
#[derive(Clone, Default)]
pub struct Translator {
    backend: Option<Arc<dyn Translate>>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("backend", &self.backend.is_some())
            .finish()
    }
}

impl Translator {
    pub fn new(backend: impl Translate + 'static) -> Self {
        Self {
            backend: Some(Arc::new(backend)),
        }
    }

    pub fn from_arc(backend: Arc<dyn Translate>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// No backend: every lookup returns its default
    pub fn defaults_only() -> Self {
        Self::default()
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn translate(&self, scope: &[&str], key: &str, default: &str) -> String {
        self.backend
            .as_ref()
            .and_then(|backend| backend.translate(scope, key))
            .unwrap_or_else(|| default.to_string())
    }

    /// Label for a field without an explicit one
    pub fn label(&self, name: &str) -> String {
        self.translate(LABELS_SCOPE, name, &humanize(name))
    }

    /// Message for a field error key
    pub fn error_message(&self, key: &str) -> String {
        let default = default_message(key).unwrap_or(FALLBACK_MESSAGE);
        self.translate(ERRORS_SCOPE, key, default)
    }
}
