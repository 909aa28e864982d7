//! In-memory SCORM runtime.
//!
//! Stand-ins for the host side of the adapter:
//!
//! - **[`MemoryLms`]**: an API object for one protocol version with a
//!   key/value data model, standard error codes, a call journal and
//!   scriptable faults
//! - **[`Window`]**: a tree of execution contexts (frames, popups, documents)
//!   that can carry API objects
//! - **[`Fixture`]**: a JSON description of both, used by the CLI
//!
//! None of this is a compliant LMS; it models just enough of one to drive
//! discovery and session code deterministically.

pub mod codes;
pub mod fixture;
pub mod lms;
pub mod window;

pub use fixture::{Fixture, FixtureError, LmsFixture, Location, Placement, Staged};
pub use lms::{Faults, MemoryLms, Phase, RecordedCall};
pub use window::Window;
