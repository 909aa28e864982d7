//! Data channel: get, set, commit and status against an active session.

use std::fmt;
use std::str::FromStr;

use scorm_protocol::{Environment, is_exit_field, is_status_field};

use super::Session;
use crate::error::{Error, Operation, Result};
use crate::handle::RuntimeApi;
use crate::trace::trace_if;

/// Action requested from [`Session::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
	Get,
	Set,
}

impl FromStr for StatusAction {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"get" => Ok(StatusAction::Get),
			"set" => Ok(StatusAction::Set),
			other => Err(Error::InvalidStatusAction(other.to_string())),
		}
	}
}

impl fmt::Display for StatusAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StatusAction::Get => f.write_str("get"),
			StatusAction::Set => f.write_str("set"),
		}
	}
}

impl<E: Environment> Session<E> {
	/// Cached handle of an active session.
	fn active_api(&self, prefix: &str, operation: Operation) -> Result<RuntimeApi> {
		if !self.is_active() {
			return Err(self.fail(prefix, Error::NotActive { operation }));
		}
		// Active implies a handle; guard anyway rather than panic.
		self.api.clone().ok_or_else(|| {
			self.fail(
				prefix,
				Error::ApiNotFound {
					version: self.version,
				},
			)
		})
	}

	/// Reads a data model element.
	///
	/// An empty value is accepted as long as the runtime's error code is zero.
	pub fn get(&mut self, field: &str) -> Result<String> {
		let prefix = format!("data.get({field})");
		let api = self.active_api(&prefix, Operation::GetValue)?;

		let value = api
			.get_value(field)
			.map_err(|err| self.fail(&prefix, err.into()))?;
		let code = self.inspector().error_code();

		if value.is_empty() && code != 0 {
			let diagnostic = self.inspector().explain(code);
			return Err(self.fail(
				&prefix,
				Error::CallFailed {
					operation: Operation::GetValue,
					diagnostic,
				},
			));
		}

		if is_status_field(field) {
			self.completion_status = Some(value.clone());
		} else if is_exit_field(field) {
			self.exit_status = Some(value.clone());
		}

		trace_if!(self.tracing(), "{} value: {}", prefix, value);
		Ok(value)
	}

	/// Writes a data model element.
	pub fn set(&mut self, field: &str, value: &str) -> Result<()> {
		let prefix = format!("data.set({field})");
		let api = self.active_api(&prefix, Operation::SetValue)?;

		let stored = api
			.set_value(field, value)
			.map_err(|err| self.fail(&prefix, err.into()))?;
		if !stored {
			let diagnostic = self.inspector().capture();
			return Err(self.fail(
				&prefix,
				Error::CallFailed {
					operation: Operation::SetValue,
					diagnostic,
				},
			));
		}

		if is_status_field(field) {
			self.completion_status = Some(value.to_string());
		} else if is_exit_field(field) {
			self.exit_status = Some(value.to_string());
		}

		trace_if!(self.tracing(), "{} value: {}", prefix, value);
		Ok(())
	}

	/// Asks the runtime to persist everything set so far.
	pub fn save(&mut self) -> Result<()> {
		const PREFIX: &str = "data.save";
		let api = self.active_api(PREFIX, Operation::Commit)?;

		let committed = api.commit().map_err(|err| self.fail(PREFIX, err.into()))?;
		if !committed {
			let diagnostic = self.inspector().capture();
			return Err(self.fail(
				PREFIX,
				Error::CallFailed {
					operation: Operation::Commit,
					diagnostic,
				},
			));
		}
		Ok(())
	}

	/// Reads or writes the version's completion status field.
	///
	/// `Set` returns the value written. `Set` without a value fails before the
	/// runtime is contacted.
	pub fn status(&mut self, action: StatusAction, value: Option<&str>) -> Result<String> {
		const PREFIX: &str = "getStatus";
		let field = self.version.map(|v| v.fields().status).unwrap_or_default();

		match action {
			StatusAction::Get => self.get(field),
			StatusAction::Set => {
				let value = value
					.filter(|v| !v.is_empty())
					.ok_or_else(|| self.fail(PREFIX, Error::MissingStatusValue))?;
				self.set(field, value)?;
				Ok(value.to_string())
			}
		}
	}
}
