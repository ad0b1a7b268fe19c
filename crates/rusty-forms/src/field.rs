// File: src/field.rs
// Purpose: Field declarations and single-field validation

use crate::condition::{Activation, Condition, ConditionOutcome, Polarity};
use crate::config::InactiveFieldPolicy;
use crate::engine::ParseContext;
use crate::errors::FormError;
use crate::form::Form;
use crate::form_data::FormValue;
use crate::translate::Translator;
use crate::value::{UploadedFile, Value};
use regex::Regex;
use rusty_forms_validation::{
    below_min_length, exceeds_max_length, is_acceptable, is_multiline, is_one_of,
    matches_pattern, parse_accept, scrub, Presence, Scrub,
};
use std::fmt;
use std::sync::Arc;

type FillFn = Arc<dyn Fn(&serde_json::Value) -> Value + Send + Sync>;

/// Options for one field, collected with builder methods
///
/// ```rust,ignore
/// FieldOptions::new().optional().max_length(140).scrub([Scrub::Strip, Scrub::Squeeze])
/// ```
pub struct FieldOptions<F> {
    key: Option<String>,
    required: bool,
    multiline: bool,
    multiple: bool,
    key_required: bool,
    max_length: Option<usize>,
    min_length: Option<usize>,
    pattern: Option<String>,
    values: Option<Vec<String>>,
    blank: Option<Value>,
    scrub: Vec<Scrub>,
    label: Option<String>,
    accept: Option<String>,
    maxsize: Option<u64>,
    activation: Option<Activation<F>>,
    fill: Option<FillFn>,
}

impl<F> Default for FieldOptions<F> {
    fn default() -> Self {
        Self {
            key: None,
            required: true,
            multiline: false,
            multiple: false,
            key_required: true,
            max_length: None,
            min_length: None,
            pattern: None,
            values: None,
            blank: None,
            scrub: Vec::new(),
            label: None,
            accept: None,
            maxsize: None,
            activation: None,
            fill: None,
        }
    }
}

impl<F> FieldOptions<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire name, when it differs from the field name
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(self) -> Self {
        self.required(false)
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// The key may be left out of the input entirely
    pub fn key_optional(mut self) -> Self {
        self.key_required = false;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Value stored instead of blank input on an optional field
    pub fn blank(mut self, value: impl Into<Value>) -> Self {
        self.blank = Some(value.into());
        self
    }

    pub fn scrub(mut self, pipeline: impl IntoIterator<Item = Scrub>) -> Self {
        self.scrub = pipeline.into_iter().collect();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Comma-separated content types (`type/*` allowed) for file uploads
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Byte budget across every file submitted for the field
    pub fn maxsize(mut self, bytes: u64) -> Self {
        self.maxsize = Some(bytes);
        self
    }

    /// Only read the field when `condition` holds. Replaces any `defined_unless`.
    pub fn defined_if(mut self, condition: impl Into<Condition<F>>) -> Self {
        self.activation = Some(Activation {
            polarity: Polarity::DefinedIf,
            condition: condition.into(),
        });
        self
    }

    /// Only read the field when `condition` does not hold. Replaces any `defined_if`.
    pub fn defined_unless(mut self, condition: impl Into<Condition<F>>) -> Self {
        self.activation = Some(Activation {
            polarity: Polarity::DefinedUnless,
            condition: condition.into(),
        });
        self
    }

    /// Compute the field's value when filling from another object
    pub fn fill_with(mut self, f: impl Fn(&serde_json::Value) -> Value + Send + Sync + 'static) -> Self {
        self.fill = Some(Arc::new(f));
        self
    }
}

/// One named slot of a form schema
pub struct Field<F> {
    name: String,
    key: String,
    required: bool,
    multiline: bool,
    multiple: bool,
    key_required: bool,
    max_length: Option<usize>,
    min_length: Option<usize>,
    pattern: Option<Regex>,
    values: Option<Vec<String>>,
    blank: Option<Value>,
    scrub: Vec<Scrub>,
    label: Option<String>,
    accept: Option<Vec<String>>,
    maxsize: Option<u64>,
    activation: Option<Activation<F>>,
    fill: Option<FillFn>,
}

impl<F> Field<F> {
    pub fn new(name: impl Into<String>, options: FieldOptions<F>) -> Result<Self, FormError> {
        let name = name.into();
        if name.is_empty() {
            return Err(FormError::Schema("field name cannot be empty".to_string()));
        }

        let pattern = options
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| FormError::Schema(format!("bad pattern for {name}: {e}")))?;

        let accept = match options.accept.as_deref() {
            Some(list) => {
                let accept = parse_accept(list);
                if accept.is_empty() {
                    return Err(FormError::Schema(format!("empty accept list for {name}")));
                }
                Some(accept)
            }
            None => None,
        };

        if let (Some(min), Some(max)) = (options.min_length, options.max_length) {
            if min > max {
                return Err(FormError::Schema(format!(
                    "min_length {min} exceeds max_length {max} for {name}"
                )));
            }
        }

        Ok(Self {
            key: options.key.unwrap_or_else(|| name.clone()),
            name,
            required: options.required,
            multiline: options.multiline,
            multiple: options.multiple,
            key_required: options.key_required,
            max_length: options.max_length,
            min_length: options.min_length,
            pattern,
            values: options.values,
            blank: options.blank,
            scrub: options.scrub,
            label: options.label,
            accept,
            maxsize: options.maxsize,
            activation: options.activation,
            fill: options.fill,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn is_key_required(&self) -> bool {
        self.key_required
    }

    pub fn accepts_files(&self) -> bool {
        self.accept.is_some()
    }

    /// Explicit label, else the translated or humanized field name
    pub fn label(&self, translator: &Translator) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => translator.label(&self.name),
        }
    }

    /// Attribute value before anything is parsed or filled
    pub fn initial_value(&self) -> Value {
        if self.multiple {
            Value::List(Vec::new())
        } else {
            Value::Null
        }
    }

    pub(crate) fn fill_value(&self, source: &serde_json::Value) -> Option<Value> {
        self.fill.as_ref().map(|fill| fill(source))
    }

    /// Scrub and check one raw string, recording every failed check.
    pub fn validate(&self, raw: &str, ctx: &mut ParseContext<'_>) -> Value {
        let value = scrub(raw, &self.scrub);

        if value.is_blank() {
            if self.required {
                self.report(ctx, "required");
            }
            return match &self.blank {
                Some(substitute) => substitute.clone(),
                None => Value::Text(value),
            };
        }

        if !self.multiline && is_multiline(&value) {
            self.report(ctx, "not_multiline");
        }

        let max_length = self.max_length.unwrap_or(ctx.default_max_length());
        if exceeds_max_length(&value, max_length) {
            self.report(ctx, "too_long");
        }

        if self.min_length.is_some_and(|min| below_min_length(&value, min)) {
            self.report(ctx, "too_short");
        }

        if self.pattern.as_ref().is_some_and(|pattern| !matches_pattern(&value, pattern)) {
            self.report(ctx, "no_match");
        }

        if self.values.as_ref().is_some_and(|values| !is_one_of(&value, values)) {
            self.report(ctx, "bad_value");
        }

        Value::Text(value)
    }

    /// Fields without an accept list take no files at all
    pub fn acceptable_file(&self, file: &UploadedFile) -> bool {
        self.accept.as_ref().is_some_and(|accept| {
            is_acceptable(&file.content_type, &file.original_filename, accept)
        })
    }

    pub fn validate_file(&self, file: &UploadedFile, ctx: &mut ParseContext<'_>) {
        if !self.acceptable_file(file) {
            self.report(ctx, "not_accepted");
        }
    }

    /// Validate every submitted value, building the attribute from `current`.
    ///
    /// Multiple fields append each value; single fields end up holding the
    /// last one. The size budget is checked once, after all files.
    pub fn validate_all(
        &self,
        values: Vec<FormValue>,
        current: Value,
        ctx: &mut ParseContext<'_>,
    ) -> Value {
        let mut result = current;
        let mut size = 0u64;

        for value in values {
            let item = match value {
                FormValue::Text(text) => self.validate(&text, ctx),
                FormValue::File(file) => {
                    self.validate_file(&file, ctx);
                    size += file.size();
                    Value::File(file)
                }
            };

            if self.multiple {
                result.push(item);
            } else {
                result = item;
            }
        }

        if self.maxsize.is_some_and(|max| size > max) {
            self.report(ctx, "too_large");
        }

        result
    }

    fn report(&self, ctx: &mut ParseContext<'_>, key: &str) {
        let label = self.label(ctx.translator());
        ctx.field_error(&self.name, label, key);
    }
}

impl<F: Form> Field<F> {
    pub fn activation_outcome(
        &self,
        form: &F,
        policy: InactiveFieldPolicy,
    ) -> Result<ConditionOutcome, FormError> {
        let Some(activation) = &self.activation else {
            return Ok(ConditionOutcome::Continue);
        };

        if activation.is_active(form)? {
            return Ok(ConditionOutcome::Continue);
        }

        Ok(match policy {
            InactiveFieldPolicy::Skip => ConditionOutcome::SkipField,
            InactiveFieldPolicy::Halt => ConditionOutcome::HaltRemainingFields,
        })
    }
}

impl<F> fmt::Debug for Field<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("required", &self.required)
            .field("multiple", &self.multiple)
            .field("key_required", &self.key_required)
            .field("activation", &self.activation)
            .finish_non_exhaustive()
    }
}
