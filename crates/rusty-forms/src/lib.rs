//! # rusty-forms
//!
//! Declarative form schemas for web applications. A form declares its fields
//! (with per-field constraints) and cross-field validations; parsing reconciles
//! raw input against that declaration and either fills the form with values and
//! validation errors or fails with a structural error when the input doesn't
//! match the schema at all.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rusty_forms::prelude::*;
//!
//! form! {
//!     #[derive(Debug)]
//!     pub struct PostForm {
//!         title: FieldOptions::new().max_length(80).scrub([Scrub::Strip]),
//!         body: FieldOptions::new().multiline().max_length(10_000),
//!         tags: FieldOptions::new().multiple().optional(),
//!     }
//! }
//!
//! let mut form = PostForm::default();
//! form.parse("title=Hello&body=First+post")?;
//!
//! if form.valid() {
//!     // use form.title, form.body ...
//! } else {
//!     for error in form.errors() {
//!         println!("{error}"); // e.g. "Title is required"
//!     }
//! }
//! ```
//!
//! ## Input
//!
//! - URL-encoded strings (`&str` / `String`)
//! - [`FormRequest`]: a request body with its content type, either
//!   `application/x-www-form-urlencoded` or `multipart/form-data`. Multipart parts
//!   are decoded while reading, through [`FormRequest::read`] or the axum extractor
//! - [`FormData`] or plain maps / JSON objects, bypassing decoding
//!
//! ## Errors
//!
//! Missing keys, repeated values for single-valued fields and unexpected keys
//! abort the parse with a [`FormError`]. Everything else is recorded as a
//! [`ValidationError`] and every applicable check runs.

#![doc(html_root_url = "https://docs.rs/rusty-forms/0.1.0")]

pub mod condition;
pub mod config;
pub mod engine;
pub mod errors;
pub mod field;
pub mod form;
pub mod form_data;
pub mod multipart;
pub mod request;
pub mod schema;
pub mod translate;
pub mod validation;
pub mod value;

pub use condition::{Activation, Condition, ConditionOutcome, Polarity};
pub use config::{FormConfig, InactiveFieldPolicy};
pub use engine::{Engine, ParseContext, FRAMEWORK_KEYS};
pub use errors::{Errors, FormError, ValidationError};
pub use field::{Field, FieldOptions};
pub use form::Form;
pub use form_data::{FormData, FormValue, IntoFormData};
pub use request::FormRequest;
pub use schema::{Schema, SchemaBuilder};
pub use translate::{humanize, Catalog, Translate, Translator};
pub use validation::Validation;
pub use value::{UploadedFile, Value};

// Scrub names and presence checks live in the validation crate
pub use rusty_forms_validation as checks;
pub use rusty_forms_validation::{Presence, Scrub};

pub mod prelude {
    pub use crate::{
        form, Condition, Engine, FieldOptions, Form, FormConfig, FormData, FormError,
        FormRequest, Presence, Scrub, UploadedFile, Validation, Value,
    };
}

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
