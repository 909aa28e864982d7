//! Error types for session and data operations.

use std::fmt;

use scorm_protocol::{InvokeError, Version};
use serde::Serialize;
use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Runtime operation a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
	Initialize,
	Terminate,
	GetValue,
	SetValue,
	Commit,
}

impl Operation {
	pub fn as_str(self) -> &'static str {
		match self {
			Operation::Initialize => "initialize",
			Operation::Terminate => "terminate",
			Operation::GetValue => "getValue",
			Operation::SetValue => "setValue",
			Operation::Commit => "commit",
		}
	}
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error state read back from the runtime right after a failing call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ErrorDiagnostic {
	/// Parsed last-error code (`-1` when unreadable).
	pub code: i32,
	/// Runtime's error string for `code`.
	pub info: String,
	/// Runtime's diagnostic string for `code`.
	pub diagnostic: String,
}

impl fmt::Display for ErrorDiagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "error code {}", self.code)?;
		if !self.info.is_empty() {
			write!(f, " ({})", self.info)?;
		}
		if !self.diagnostic.is_empty() {
			write!(f, ": {}", self.diagnostic)?;
		}
		Ok(())
	}
}

/// Errors that can occur while driving a runtime session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
	/// No runtime API object was found in any searched context.
	#[error("runtime API not found{}", version.map(|v| format!(" (SCORM {v} requested)")).unwrap_or_default())]
	ApiNotFound { version: Option<Version> },

	/// The runtime reported failure for a call.
	#[error("{operation} failed: {diagnostic}")]
	CallFailed {
		operation: Operation,
		diagnostic: ErrorDiagnostic,
	},

	/// The runtime reported success but left a non-zero error code behind.
	#[error("{operation} reported success but left {diagnostic}")]
	InconsistentSuccess {
		operation: Operation,
		diagnostic: ErrorDiagnostic,
	},

	/// Initialize was called on an active connection.
	#[error("connection already active")]
	AlreadyActive,

	/// A data or terminate operation was called without an active connection.
	#[error("{operation} aborted: connection is inactive")]
	NotActive { operation: Operation },

	/// Status `set` was requested without a value.
	#[error("status was not specified")]
	MissingStatusValue,

	/// Status action other than `get` or `set`.
	#[error("no valid status action was specified: {0:?}")]
	InvalidStatusAction(String),

	/// The host could not perform the call at all.
	#[error("runtime call failed: {0}")]
	Invoke(#[from] InvokeError),
}

impl Error {
	/// Diagnostic captured from the runtime, when the failure came from it.
	pub fn diagnostic(&self) -> Option<&ErrorDiagnostic> {
		match self {
			Error::CallFailed { diagnostic, .. } | Error::InconsistentSuccess { diagnostic, .. } => {
				Some(diagnostic)
			}
			_ => None,
		}
	}

	/// Returns true for failures caused by calling in the wrong session state.
	pub fn is_precondition(&self) -> bool {
		matches!(
			self,
			Error::AlreadyActive
				| Error::NotActive { .. }
				| Error::MissingStatusValue
				| Error::InvalidStatusAction(_)
		)
	}

	/// Stable machine-readable code for structured output.
	pub fn code(&self) -> &'static str {
		match self {
			Error::ApiNotFound { .. } => "API_NOT_FOUND",
			Error::CallFailed { .. } => "CALL_FAILED",
			Error::InconsistentSuccess { .. } => "INCONSISTENT_SUCCESS",
			Error::AlreadyActive => "ALREADY_ACTIVE",
			Error::NotActive { .. } => "NOT_ACTIVE",
			Error::MissingStatusValue => "MISSING_STATUS_VALUE",
			Error::InvalidStatusAction(_) => "INVALID_STATUS_ACTION",
			Error::Invoke(_) => "INVOKE_FAILED",
		}
	}
}
