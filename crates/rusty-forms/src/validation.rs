// File: src/validation.rs
// Purpose: Cross-field validations run after every field has been parsed

use crate::condition::Condition;
use crate::errors::{FormError, ValidationError};
use crate::form::Form;
use crate::translate::{default_message, Translator, ERRORS_SCOPE};
use crate::value::Value;
use rusty_forms_validation::Presence;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

enum Check<F> {
    /// Receives the target field's value
    Value(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
    /// Receives the whole form
    Form(Arc<dyn Fn(&F) -> bool + Send + Sync>),
}

/// A rule over the parsed form, producing one error when it fails
pub struct Validation<F> {
    field: Option<String>,
    error: String,
    precondition: Option<Condition<F>>,
    check: Check<F>,
}

impl<F> Validation<F> {
    /// Check the target field's value on its own
    pub fn value(field: impl Into<String>, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            field: Some(field.into()),
            error: "invalid".to_string(),
            precondition: None,
            check: Check::Value(Arc::new(f)),
        }
    }

    /// Check with access to every field, reporting against `field`
    pub fn form(field: impl Into<String>, f: impl Fn(&F) -> bool + Send + Sync + 'static) -> Self {
        Self {
            field: Some(field.into()),
            error: "invalid".to_string(),
            precondition: None,
            check: Check::Form(Arc::new(f)),
        }
    }

    /// Form-level check; the error key doubles as the default message
    pub fn check(f: impl Fn(&F) -> bool + Send + Sync + 'static) -> Self {
        Self {
            field: None,
            error: "invalid".to_string(),
            precondition: None,
            check: Check::Form(Arc::new(f)),
        }
    }

    /// Error key to report (default `invalid`)
    pub fn error(mut self, key: impl Into<String>) -> Self {
        self.error = key.into();
        self
    }

    /// Only run when `condition` holds
    pub fn when(mut self, condition: impl Into<Condition<F>>) -> Self {
        self.precondition = Some(condition.into());
        self
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn error_key(&self) -> &str {
        &self.error
    }
}

impl<F: Form> Validation<F> {
    fn precondition_holds(&self, form: &F) -> Result<bool, FormError> {
        match &self.precondition {
            Some(condition) => condition.evaluate(form),
            None => Ok(true),
        }
    }

    /// Runs the check unless its precondition fails or, for field checks, the
    /// target is blank or already has errors. Returns the error to record.
    pub fn evaluate(
        &self,
        form: &F,
        translator: &Translator,
    ) -> Result<Option<ValidationError>, FormError> {
        if !self.precondition_holds(form)? {
            return Ok(None);
        }

        let Some(name) = self.field.as_deref() else {
            if self.run(form, &Value::Null) {
                return Ok(None);
            }
            let default = default_message(&self.error).unwrap_or(self.error.as_str());
            let message = translator.translate(ERRORS_SCOPE, &self.error, default);
            return Ok(Some(ValidationError::on_form(message)));
        };

        let value = form
            .value(name)
            .ok_or_else(|| FormError::Schema(format!("validation targets unknown field {name}")))?;

        if value.is_blank() || form.errors().has_errors_on(name) {
            trace!(field = name, "skipping validation");
            return Ok(None);
        }

        if self.run(form, value) {
            return Ok(None);
        }

        let label = F::schema()
            .field(name)
            .map(|field| field.label(translator))
            .unwrap_or_else(|| translator.label(name));
        Ok(Some(ValidationError::on_field(
            name,
            label,
            translator.error_message(&self.error),
        )))
    }

    fn run(&self, form: &F, value: &Value) -> bool {
        match &self.check {
            Check::Value(check) => check(value),
            Check::Form(check) => check(form),
        }
    }
}

impl<F> fmt::Debug for Validation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validation")
            .field("field", &self.field)
            .field("error", &self.error)
            .field("precondition", &self.precondition)
            .finish_non_exhaustive()
    }
}
