//! rusty-forms validation core
//!
//! Pure functions shared by the form engine: presence checks, the scrub
//! pipeline, string checks and the MIME rules used to accept uploads.

pub mod mime;
pub mod presence;
pub mod scrub;
pub mod string;

// Re-export all validators
pub use mime::*;
pub use presence::*;
pub use scrub::*;
pub use string::*;
