//! Contracts between the SCORM adapter and the runtime it talks to.
//!
//! This crate holds the pieces every side of the adapter agrees on:
//!
//! - **Versions**: the two protocol variants and their method bindings
//! - **Values**: what a runtime method returns, and how it coerces
//! - **Capabilities**: the [`ApiObject`] and [`Environment`] traits
//!
//! # Decoupling via traits
//!
//! The session logic in `scorm-rs` only sees [`ApiObject`] and [`Environment`].
//! Host bindings (browser windows, in-memory fakes) implement them here
//! without depending on the session crate, which keeps fakes usable from the
//! session crate's own integration tests.

pub mod api;
pub mod environment;
pub mod value;
pub mod version;

pub use api::{ApiObject, InvokeError};
pub use environment::Environment;
pub use value::{RuntimeValue, UNPARSEABLE_ERROR_CODE, parse_error_code};
pub use version::{FieldNames, MethodBindings, ParseVersionError, Version, is_exit_field, is_status_field};
