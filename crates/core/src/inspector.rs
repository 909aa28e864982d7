//! Runtime error introspection.
//!
//! The runtime keeps a single "last error" slot that every call overwrites, so
//! the inspector must run immediately after the call that failed.

use scorm_protocol::{UNPARSEABLE_ERROR_CODE, parse_error_code};

use crate::error::ErrorDiagnostic;
use crate::handle::RuntimeApi;
use crate::trace::trace_if;

/// Stateless reader of the runtime's error slot.
///
/// Every method tolerates a missing handle by returning a zero or empty
/// default with a trace line.
#[derive(Debug, Clone, Copy)]
pub struct ErrorInspector<'a> {
	api: Option<&'a RuntimeApi>,
	trace: bool,
}

impl<'a> ErrorInspector<'a> {
	pub fn new(api: Option<&'a RuntimeApi>) -> Self {
		Self { api, trace: false }
	}

	pub fn with_trace(mut self, enabled: bool) -> Self {
		self.trace = enabled;
		self
	}

	/// Last error code; [`UNPARSEABLE_ERROR_CODE`] when it cannot be read.
	pub fn error_code(&self) -> i32 {
		let Some(api) = self.api else {
			trace_if!(self.trace, "debug.getCode: API is null");
			return 0;
		};
		match api.last_error() {
			Ok(raw) => parse_error_code(&raw).unwrap_or(UNPARSEABLE_ERROR_CODE),
			Err(err) => {
				trace_if!(self.trace, "debug.getCode: {}", err);
				UNPARSEABLE_ERROR_CODE
			}
		}
	}

	/// Human-readable string for `code`.
	pub fn error_info(&self, code: i32) -> String {
		let Some(api) = self.api else {
			trace_if!(self.trace, "debug.getInfo: API is null");
			return String::new();
		};
		api.error_string(code).unwrap_or_else(|err| {
			trace_if!(self.trace, "debug.getInfo: {}", err);
			String::new()
		})
	}

	/// Vendor diagnostic for `code`.
	pub fn diagnostic_info(&self, code: i32) -> String {
		let Some(api) = self.api else {
			trace_if!(self.trace, "debug.getDiagnosticInfo: API is null");
			return String::new();
		};
		api.diagnostic(code).unwrap_or_else(|err| {
			trace_if!(self.trace, "debug.getDiagnosticInfo: {}", err);
			String::new()
		})
	}

	/// Reads code, info and diagnostic in one go.
	pub fn capture(&self) -> ErrorDiagnostic {
		self.explain(self.error_code())
	}

	/// Info and diagnostic for a code that was already read.
	pub fn explain(&self, code: i32) -> ErrorDiagnostic {
		ErrorDiagnostic {
			code,
			info: self.error_info(code),
			diagnostic: self.diagnostic_info(code),
		}
	}
}
