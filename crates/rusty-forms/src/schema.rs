// File: src/schema.rs
// Purpose: Ordered field and validation declarations for one form type

use crate::errors::FormError;
use crate::field::{Field, FieldOptions};
use crate::validation::Validation;
use crate::value::Value;
use std::collections::HashSet;
use std::fmt;

/// Fields (in declaration order) and cross-field validations of a form.
///
/// Built once per form type and shared, read-only, by every parse.
pub struct Schema<F> {
    fields: Vec<Field<F>>,
    validations: Vec<Validation<F>>,
}

impl<F> Schema<F> {
    pub fn builder() -> SchemaBuilder<F> {
        SchemaBuilder::default()
    }

    pub fn new(fields: Vec<Field<F>>, validations: Vec<Validation<F>>) -> Result<Self, FormError> {
        let mut names = HashSet::new();
        let mut keys = HashSet::new();

        for field in &fields {
            if !names.insert(field.name()) {
                return Err(FormError::Schema(format!("duplicate field {}", field.name())));
            }
            if !keys.insert(field.key()) {
                return Err(FormError::Schema(format!("duplicate form key {}", field.key())));
            }
        }

        for validation in &validations {
            if let Some(target) = validation.field_name() {
                if !names.contains(target) {
                    return Err(FormError::Schema(format!(
                        "validation targets unknown field {target}"
                    )));
                }
            }
        }

        Ok(Self {
            fields,
            validations,
        })
    }

    pub fn fields(&self) -> &[Field<F>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field<F>> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(Field::name).collect()
    }

    pub fn validations(&self) -> &[Validation<F>] {
        &self.validations
    }

    /// Starting value for the named field (`Null` for unknown names)
    pub fn initial_value(&self, name: &str) -> Value {
        self.field(name).map(Field::initial_value).unwrap_or_default()
    }
}

impl<F> fmt::Debug for Schema<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.fields)
            .field("validations", &self.validations)
            .finish()
    }
}

/// Collects declarations; the first invalid one is reported by `build`
pub struct SchemaBuilder<F> {
    fields: Vec<Result<Field<F>, FormError>>,
    validations: Vec<Validation<F>>,
}

impl<F> Default for SchemaBuilder<F> {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            validations: Vec::new(),
        }
    }
}

impl<F> SchemaBuilder<F> {
    pub fn field(mut self, name: impl Into<String>, options: FieldOptions<F>) -> Self {
        self.fields.push(Field::new(name, options));
        self
    }

    pub fn validation(mut self, validation: Validation<F>) -> Self {
        self.validations.push(validation);
        self
    }

    pub fn build(self) -> Result<Schema<F>, FormError> {
        let fields = self.fields.into_iter().collect::<Result<Vec<_>, _>>()?;
        Schema::new(fields, self.validations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct NoForm;

    #[test]
    fn test_preserves_declaration_order() {
        let schema = Schema::<NoForm>::builder()
            .field("zeta", FieldOptions::new())
            .field("alpha", FieldOptions::new().multiple())
            .build()
            .unwrap();

        assert_eq!(schema.field_names(), vec!["zeta", "alpha"]);
        assert_eq!(schema.initial_value("zeta"), Value::Null);
        assert_eq!(schema.initial_value("alpha"), Value::List(vec![]));
    }

    #[test]
    fn test_rejects_duplicate_names_and_keys() {
        let duplicate_name = Schema::<NoForm>::builder()
            .field("title", FieldOptions::new())
            .field("title", FieldOptions::new())
            .build();
        assert!(matches!(duplicate_name, Err(FormError::Schema(_))));

        let duplicate_key = Schema::<NoForm>::builder()
            .field("title", FieldOptions::new())
            .field("heading", FieldOptions::new().key("title"))
            .build();
        assert!(matches!(duplicate_key, Err(FormError::Schema(_))));
    }

    #[test]
    fn test_rejects_validation_of_unknown_field() {
        let result = Schema::<NoForm>::builder()
            .field("email", FieldOptions::new())
            .validation(Validation::value("emial", |_| true))
            .build();

        match result {
            Err(err) => assert_eq!(
                err.to_string(),
                "invalid form schema: validation targets unknown field emial"
            ),
            Ok(_) => panic!("expected schema error"),
        }
    }

    #[test]
    fn test_first_bad_field_is_reported() {
        let result = Schema::<NoForm>::builder()
            .field("code", FieldOptions::new().pattern("[unclosed"))
            .build();
        assert!(matches!(result, Err(FormError::Schema(_))));
    }
}
