// File: src/condition.rs
// Purpose: Predicates over a form instance, used for field activation and validation guards

use crate::errors::FormError;
use crate::form::Form;
use std::fmt;
use std::sync::Arc;

type Block<F> = Arc<dyn Fn(&F) -> bool + Send + Sync>;

/// A declared predicate, evaluated against the form being parsed
pub enum Condition<F> {
    /// Fixed answer
    Property(bool),
    /// Closure over the form
    Block(Block<F>),
    /// A predicate registered by name on the form, or else whether the field
    /// with that name holds a value at all. A blank string still counts.
    Method(String),
}

impl<F> Condition<F> {
    pub fn property(value: bool) -> Self {
        Condition::Property(value)
    }

    pub fn block(f: impl Fn(&F) -> bool + Send + Sync + 'static) -> Self {
        Condition::Block(Arc::new(f))
    }

    pub fn method(name: impl Into<String>) -> Self {
        Condition::Method(name.into())
    }
}

impl<F: Form> Condition<F> {
    pub fn evaluate(&self, form: &F) -> Result<bool, FormError> {
        match self {
            Condition::Property(value) => Ok(*value),
            Condition::Block(block) => Ok(block(form)),
            Condition::Method(name) => form
                .predicate(name)
                .or_else(|| form.value(name).map(|value| !value.is_null()))
                .ok_or_else(|| FormError::UnknownCondition(name.clone())),
        }
    }
}

impl<F> Clone for Condition<F> {
    fn clone(&self) -> Self {
        match self {
            Condition::Property(value) => Condition::Property(*value),
            Condition::Block(block) => Condition::Block(Arc::clone(block)),
            Condition::Method(name) => Condition::Method(name.clone()),
        }
    }
}

impl<F> fmt::Debug for Condition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Property(value) => f.debug_tuple("Property").field(value).finish(),
            Condition::Block(_) => f.write_str("Block(..)"),
            Condition::Method(name) => f.debug_tuple("Method").field(name).finish(),
        }
    }
}

impl<F> From<bool> for Condition<F> {
    fn from(value: bool) -> Self {
        Condition::Property(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    DefinedIf,
    DefinedUnless,
}

/// When a field takes part in a parse
pub struct Activation<F> {
    pub polarity: Polarity,
    pub condition: Condition<F>,
}

impl<F> Clone for Activation<F> {
    fn clone(&self) -> Self {
        Self {
            polarity: self.polarity,
            condition: self.condition.clone(),
        }
    }
}

impl<F> fmt::Debug for Activation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("polarity", &self.polarity)
            .field("condition", &self.condition)
            .finish()
    }
}

impl<F: Form> Activation<F> {
    pub fn is_active(&self, form: &F) -> Result<bool, FormError> {
        let holds = self.condition.evaluate(form)?;
        Ok(match self.polarity {
            Polarity::DefinedIf => holds,
            Polarity::DefinedUnless => !holds,
        })
    }
}

/// What the field loop does after checking a field's activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOutcome {
    Continue,
    SkipField,
    HaltRemainingFields,
}
