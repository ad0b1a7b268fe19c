// File: src/form.rs
// Purpose: The Form trait and the `form!` declaration macro

use crate::engine::Engine;
use crate::errors::{Errors, FormError, ValidationError};
use crate::form_data::IntoFormData;
use crate::schema::Schema;
use crate::translate::Translator;
use crate::value::Value;
use serde::Serialize;
use std::collections::HashMap;

/// A record type backed by a [`Schema`]
///
/// Implemented by the [`form!`](crate::form!) macro; the required methods map
/// field names to the struct's slots.
pub trait Form: Sized + 'static {
    fn schema() -> &'static Schema<Self>;

    fn value(&self, name: &str) -> Option<&Value>;

    fn value_mut(&mut self, name: &str) -> Option<&mut Value>;

    fn errors(&self) -> &Errors;

    fn errors_mut(&mut self) -> &mut Errors;

    /// Named predicate for [`Condition::Method`](crate::Condition::Method)
    fn predicate(&self, _name: &str) -> Option<bool> {
        None
    }

    /// Parse with the default engine
    fn parse<I: IntoFormData>(&mut self, input: I) -> Result<&mut Self, FormError> {
        Engine::default().parse(self, input)?;
        Ok(self)
    }

    fn parse_with<I: IntoFormData>(&mut self, engine: &Engine, input: I) -> Result<&mut Self, FormError> {
        engine.parse(self, input)?;
        Ok(self)
    }

    /// Copy values from any serializable object.
    ///
    /// A field's `fill_with` function wins; otherwise a key with the field's
    /// name is used. Fields with neither are left alone.
    fn fill<S: Serialize + ?Sized>(&mut self, source: &S) -> Result<&mut Self, FormError> {
        let source = serde_json::to_value(source)?;

        for field in Self::schema().fields() {
            let value = field
                .fill_value(&source)
                .or_else(|| source.get(field.name()).cloned().map(Value::from_json));

            if let (Some(value), Some(slot)) = (value, self.value_mut(field.name())) {
                *slot = value;
            }
        }

        Ok(self)
    }

    fn valid(&self) -> bool {
        self.errors().is_empty()
    }

    fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    fn errors_on(&self, name: &str) -> Vec<&ValidationError> {
        self.errors().on(name)
    }

    fn has_errors_on(&self, name: &str) -> bool {
        self.errors().has_errors_on(name)
    }

    /// Record an error from outside the parse, e.g. after a database check
    fn add_error(&mut self, field: &str, key: &str) {
        Engine::default().add_error(self, field, key);
    }

    fn label(name: &str) -> String {
        let translator = Translator::default();
        match Self::schema().field(name) {
            Some(field) => field.label(&translator),
            None => translator.label(name),
        }
    }

    /// Every declared field with its current value
    fn to_map(&self) -> HashMap<String, Value> {
        Self::schema()
            .fields()
            .iter()
            .map(|field| {
                let value = self.value(field.name()).cloned().unwrap_or_default();
                (field.name().to_string(), value)
            })
            .collect()
    }

    fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .to_map()
            .into_iter()
            .map(|(name, value)| {
                let json = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
                (name, json)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Declares a form struct and its schema.
///
/// Each field becomes a public [`Value`] slot. Options are a
/// [`FieldOptions`](crate::FieldOptions) expression; closures inside refer to
/// the form by its name, not `Self`.
///
/// ```rust,ignore
/// form! {
///     #[derive(Debug)]
///     pub struct SignupForm {
///         email: FieldOptions::new().pattern("@"),
///         password: FieldOptions::new().min_length(8),
///         password_confirmation,
///         newsletter: FieldOptions::new().optional().key_optional(),
///     }
///     validations {
///         Validation::form("password_confirmation", |f: &SignupForm| {
///             f.password == f.password_confirmation
///         }).error("mismatch"),
///     }
/// }
/// ```
///
/// An optional `predicates { name, ... }` block registers `fn name(&self) -> bool`
/// methods for `Condition::method("name")`.
#[macro_export]
macro_rules! form {
    (@options) => {
        $crate::FieldOptions::new()
    };
    (@options $options:expr) => {
        $options
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($field:ident $(: $options:expr)?),* $(,)?
        }
        $(validations { $($validation:expr),* $(,)? })?
        $(predicates { $($predicate:ident),* $(,)? })?
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(pub $field: $crate::Value,)*
            validation_errors: $crate::Errors,
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                let schema = <$name as $crate::Form>::schema();
                Self {
                    $($field: schema.initial_value(stringify!($field)),)*
                    validation_errors: $crate::Errors::new(),
                }
            }
        }

        impl $crate::Form for $name {
            fn schema() -> &'static $crate::Schema<Self> {
                static SCHEMA: $crate::__private::Lazy<$crate::Schema<$name>> =
                    $crate::__private::Lazy::new(|| {
                        $crate::Schema::<$name>::builder()
                            $(.field(stringify!($field), $crate::form!(@options $($options)?)))*
                            $($(.validation($validation))*)?
                            .build()
                            .unwrap_or_else(|e| panic!("{}: {}", stringify!($name), e))
                    });
                &SCHEMA
            }

            #[allow(unused_variables)]
            fn value(&self, name: &str) -> Option<&$crate::Value> {
                match name {
                    $(stringify!($field) => Some(&self.$field),)*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn value_mut(&mut self, name: &str) -> Option<&mut $crate::Value> {
                match name {
                    $(stringify!($field) => Some(&mut self.$field),)*
                    _ => None,
                }
            }

            fn errors(&self) -> &$crate::Errors {
                &self.validation_errors
            }

            fn errors_mut(&mut self) -> &mut $crate::Errors {
                &mut self.validation_errors
            }

            $(
                fn predicate(&self, name: &str) -> Option<bool> {
                    match name {
                        $(stringify!($predicate) => Some(self.$predicate()),)*
                        _ => None,
                    }
                }
            )?
        }
    };
}
