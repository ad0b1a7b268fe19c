// File: src/config.rs
// Purpose: Engine configuration parsing from forms.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What happens to fields whose activation condition does not hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InactiveFieldPolicy {
    /// Skip the field and keep going; a value sent for it is an unexpected key
    #[default]
    Skip,
    /// Stop reading fields; this field's and every later field's keys are ignored
    Halt,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Strip the keys web frameworks add to every form
    /// (`authenticity_token`, `commit`, `utf8`)
    #[serde(default = "default_false")]
    pub framework_fields: bool,

    #[serde(default)]
    pub inactive_fields: InactiveFieldPolicy,

    /// Maximum characters for fields that don't set their own
    #[serde(default = "default_max_length")]
    pub default_max_length: usize,

    /// TOML translation catalog
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

fn default_false() -> bool {
    false
}

fn default_max_length() -> usize {
    64
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            framework_fields: false,
            inactive_fields: InactiveFieldPolicy::default(),
            default_max_length: default_max_length(),
            catalog: None,
        }
    }
}

impl FormConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: FormConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./forms.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("forms.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FormConfig::default();
        assert!(!config.framework_fields);
        assert_eq!(config.inactive_fields, InactiveFieldPolicy::Skip);
        assert_eq!(config.default_max_length, 64);
        assert_eq!(config.catalog, None);
    }

    #[test]
    fn test_empty_config() {
        let config = toml::from_str::<FormConfig>("").unwrap_or_default();
        assert_eq!(config, FormConfig::default());
    }

    #[test]
    fn test_custom_config() {
        let toml = r#"
            framework_fields = true
            inactive_fields = "halt"
            default_max_length = 255
            catalog = "locales/en.toml"
        "#;
        let config: FormConfig = toml::from_str(toml).unwrap();
        assert!(config.framework_fields);
        assert_eq!(config.inactive_fields, InactiveFieldPolicy::Halt);
        assert_eq!(config.default_max_length, 255);
        assert_eq!(config.catalog, Some(PathBuf::from("locales/en.toml")));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let config = FormConfig::load("/no/such/forms.toml").unwrap();
        assert_eq!(config, FormConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "framework_fields = true").unwrap();

        let config = FormConfig::load(file.path()).unwrap();
        assert!(config.framework_fields);
        assert_eq!(config.default_max_length, 64);
    }

    #[test]
    fn test_load_invalid_file_has_context() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "inactive_fields = \"sometimes\"").unwrap();

        let err = FormConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
