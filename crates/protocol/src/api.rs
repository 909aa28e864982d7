//! Runtime API object capability.

use thiserror::Error;

use crate::value::RuntimeValue;

/// Failure raised by the host while invoking a runtime method.
///
/// This covers problems the runtime contract itself has no return value for:
/// a missing method, a thrown exception, a detached object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{method}: {message}")]
pub struct InvokeError {
	/// Method name that was being called.
	pub method: String,
	/// Host-provided description.
	pub message: String,
}

impl InvokeError {
	pub fn new(method: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			method: method.into(),
			message: message.into(),
		}
	}

	/// The object has no callable member with this name.
	pub fn missing_method(method: &str) -> Self {
		Self::new(method, "method is not defined on the runtime object")
	}
}

/// Host-provided runtime API object.
///
/// Implementations forward a method name and its string arguments to the
/// underlying object and hand back whatever it returned. Calls are synchronous
/// and may mutate the object's error state, so callers must read the last error
/// immediately after a failing call.
pub trait ApiObject {
	/// Invokes `method` with `args` and returns the raw result.
	fn invoke(&self, method: &str, args: &[&str]) -> Result<RuntimeValue, InvokeError>;

	/// Short description used in trace output.
	fn describe(&self) -> String {
		"[runtime api]".to_string()
	}
}
