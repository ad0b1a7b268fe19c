// File: src/engine.rs
// Purpose: The parse algorithm: field reconciliation, leftover detection, cross-field validation

use crate::condition::ConditionOutcome;
use crate::config::FormConfig;
use crate::errors::{Errors, FormError, ValidationError};
use crate::form::Form;
use crate::form_data::IntoFormData;
use crate::translate::{Catalog, Translator};
use tracing::{debug, trace};

/// Keys web frameworks inject into every form they render
pub const FRAMEWORK_KEYS: [&str; 3] = ["authenticity_token", "commit", "utf8"];

/// What field validation needs while it runs: message lookup and somewhere
/// to put errors
pub struct ParseContext<'a> {
    translator: &'a Translator,
    errors: &'a mut Errors,
    default_max_length: usize,
}

impl<'a> ParseContext<'a> {
    pub fn new(translator: &'a Translator, errors: &'a mut Errors, default_max_length: usize) -> Self {
        Self {
            translator,
            errors,
            default_max_length,
        }
    }

    pub fn translator(&self) -> &'a Translator {
        self.translator
    }

    pub fn default_max_length(&self) -> usize {
        self.default_max_length
    }

    pub fn field_error(&mut self, field: &str, label: String, key: &str) {
        let message = self.translator.error_message(key);
        trace!(field, key, "validation error");
        self.errors.push(ValidationError::on_field(field, label, message));
    }
}

/// Parses input into forms according to their schema
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: FormConfig,
    translator: Translator,
}

impl Engine {
    pub fn new(config: FormConfig) -> Self {
        Self {
            config,
            translator: Translator::default(),
        }
    }

    /// Build from configuration, loading the translation catalog if one is set
    pub fn from_config(config: FormConfig) -> anyhow::Result<Self> {
        let translator = match &config.catalog {
            Some(path) => Translator::new(Catalog::load(path)?),
            None => Translator::default(),
        };

        Ok(Self { config, translator })
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Parse `input` into `form`.
    ///
    /// Validation problems are recorded on the form. Key mismatches between
    /// the input and the schema abort with a structural [`FormError`].
    pub fn parse<F: Form, I: IntoFormData>(&self, form: &mut F, input: I) -> Result<(), FormError> {
        let mut data = input.into_form_data()?;
        let schema = F::schema();
        let fields = schema.fields();

        debug!(form = std::any::type_name::<F>(), keys = data.len(), "parsing form");

        for (index, field) in fields.iter().enumerate() {
            match field.activation_outcome(form, self.config.inactive_fields)? {
                ConditionOutcome::Continue => {}
                ConditionOutcome::SkipField => {
                    debug!(field = field.name(), "field inactive, skipping");
                    continue;
                }
                ConditionOutcome::HaltRemainingFields => {
                    debug!(field = field.name(), "field inactive, halting");
                    for rest in &fields[index..] {
                        data.remove(rest.key());
                    }
                    break;
                }
            }

            let Some(values) = data.remove(field.key()) else {
                if field.is_multiple() || !field.is_key_required() {
                    continue;
                }
                return Err(FormError::MissingKey(field.key().to_string()));
            };

            if values.len() > 1 && !field.is_multiple() {
                return Err(FormError::DuplicateValue(field.key().to_string()));
            }

            let current = form
                .value_mut(field.name())
                .map(std::mem::take)
                .ok_or_else(|| FormError::Schema(format!("form has no slot for {}", field.name())))?;

            let value = {
                let mut ctx = ParseContext::new(
                    &self.translator,
                    form.errors_mut(),
                    self.config.default_max_length,
                );
                field.validate_all(values, current, &mut ctx)
            };

            if let Some(slot) = form.value_mut(field.name()) {
                *slot = value;
            }
        }

        if self.config.framework_fields {
            for key in FRAMEWORK_KEYS {
                data.remove(key);
            }
        }

        if !data.is_empty() {
            return Err(FormError::UnexpectedKeys(data.keys()));
        }

        for validation in schema.validations() {
            if let Some(error) = validation.evaluate(form, &self.translator)? {
                form.errors_mut().push(error);
            }
        }

        debug!(errors = form.errors().len(), "parsed form");
        Ok(())
    }

    /// Record an error against `field` using this engine's translations
    pub fn add_error<F: Form>(&self, form: &mut F, field: &str, key: &str) {
        let label = match F::schema().field(field) {
            Some(declared) => declared.label(&self.translator),
            None => self.translator.label(field),
        };
        let mut ctx = ParseContext::new(
            &self.translator,
            form.errors_mut(),
            self.config.default_max_length,
        );
        ctx.field_error(field, label, key);
    }
}
