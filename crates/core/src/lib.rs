//! scorm: locate a SCORM runtime API and drive a session against it
//!
//! Content packages talk to their LMS through an API object the LMS places on
//! some window above the content: the same frame, a parent frameset, or the
//! window that opened a popup. This crate finds that object, tags it with its
//! protocol version (SCORM 1.2 or 2004) and wraps the call sequence the
//! standard expects.
//!
//! # Examples
//!
//! ```ignore
//! use scorm::{Session, SessionConfig, StatusAction};
//!
//! fn run(window: impl scorm::Environment) -> scorm::Result<()> {
//!     let mut session = Session::new(window, SessionConfig::default());
//!     session.initialize()?;
//!
//!     let learner = session.get("cmi.learner_name")?;
//!     session.set("cmi.location", "page-3")?;
//!     session.status(StatusAction::Set, Some("completed"))?;
//!
//!     session.terminate()?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Session ──> Locator ──> Environment (host contexts)
//!    │            └─────> RuntimeApi (version-tagged ApiObject)
//!    └──> ErrorInspector (after every failing call)
//! ```

mod trace;

pub mod config;
pub mod error;
pub mod handle;
pub mod inspector;
pub mod locator;
pub mod session;

pub use config::SessionConfig;
pub use error::{Error, ErrorDiagnostic, Operation, Result};
pub use handle::RuntimeApi;
pub use inspector::ErrorInspector;
pub use locator::{Discovery, Locator, MAX_HOPS, SearchRoot};
pub use session::{ConnectionState, Session, StatusAction};

// Re-export protocol contracts so hosts only need this crate
pub use scorm_protocol;
pub use scorm_protocol::{ApiObject, Environment, InvokeError, RuntimeValue, Version};
