//! Session state machine.
//!
//! A [`Session`] owns the connection state against one runtime: the pinned
//! protocol version, the discovered handle and the cached status fields.
//! Data operations live in [`data`].
//!
//! ```text
//! Inactive --initialize--> Active --terminate--> Inactive
//! ```

mod data;

#[cfg(test)]
mod tests;

pub use data::StatusAction;

use scorm_protocol::{Environment, Version};

use crate::config::SessionConfig;
use crate::error::{Error, Operation, Result};
use crate::handle::RuntimeApi;
use crate::inspector::ErrorInspector;
use crate::locator::Locator;
use crate::trace::trace_if;

/// Connection state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
	#[default]
	Inactive,
	Active,
}

/// Caller-owned connection to a runtime API found from `env`.
pub struct Session<E: Environment> {
	env: E,
	config: SessionConfig,
	version: Option<Version>,
	api: Option<RuntimeApi>,
	state: ConnectionState,
	completion_status: Option<String>,
	exit_status: Option<String>,
}

impl<E: Environment> Session<E> {
	/// Creates an inactive session rooted at `env`.
	///
	/// A version set in `config` is pinned immediately and restricts discovery
	/// to that version's API object.
	pub fn new(env: E, config: SessionConfig) -> Self {
		Self {
			env,
			version: config.version,
			config,
			api: None,
			state: ConnectionState::Inactive,
			completion_status: None,
			exit_status: None,
		}
	}

	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	pub fn environment(&self) -> &E {
		&self.env
	}

	pub fn state(&self) -> ConnectionState {
		self.state
	}

	pub fn is_active(&self) -> bool {
		self.state == ConnectionState::Active
	}

	/// Version pinned by configuration or by the first successful discovery.
	pub fn version(&self) -> Option<Version> {
		self.version
	}

	/// Handle cached by discovery, if any.
	pub fn api(&self) -> Option<&RuntimeApi> {
		self.api.as_ref()
	}

	/// Last completion status read from or written to the runtime.
	pub fn completion_status(&self) -> Option<&str> {
		self.completion_status.as_deref()
	}

	/// Last exit status read from or written to the runtime.
	pub fn exit_status(&self) -> Option<&str> {
		self.exit_status.as_deref()
	}

	fn tracing(&self) -> bool {
		self.config.debug
	}

	fn inspector(&self) -> ErrorInspector<'_> {
		ErrorInspector::new(self.api.as_ref()).with_trace(self.tracing())
	}

	/// Traces `err` under `prefix` and hands it back.
	fn fail(&self, prefix: &str, err: Error) -> Error {
		trace_if!(self.tracing(), "{}: {}", prefix, err);
		err
	}

	/// Returns the cached handle, running discovery when there is none.
	///
	/// The first successful discovery pins the session version. Failed
	/// discoveries are not cached, so later calls search again.
	pub fn discover(&mut self) -> Result<RuntimeApi> {
		if let Some(api) = &self.api {
			return Ok(api.clone());
		}

		let discovery = Locator::new(self.version)
			.with_trace(self.tracing())
			.resolve(&self.env);

		let Some(api) = discovery.into_handle() else {
			return Err(Error::ApiNotFound {
				version: self.version,
			});
		};

		if self.version.is_none() {
			trace_if!(self.tracing(), "API.get: pinned SCORM version {}", api.version());
			self.version = Some(api.version());
		}
		self.api = Some(api.clone());
		Ok(api)
	}

	/// Last error code of the runtime, discovering a handle if needed.
	pub fn last_error_code(&mut self) -> i32 {
		let _ = self.discover();
		self.inspector().error_code()
	}

	/// Runtime's error string for `code`.
	pub fn error_info(&mut self, code: i32) -> String {
		let _ = self.discover();
		self.inspector().error_info(code)
	}

	/// Runtime's diagnostic for `code`.
	pub fn diagnostic_info(&mut self, code: i32) -> String {
		let _ = self.discover();
		self.inspector().diagnostic_info(code)
	}

	/// Opens the connection.
	///
	/// A truthy initialize is only trusted when the runtime's error code reads
	/// exactly zero afterwards. With `handle_completion_status`, a fresh
	/// attempt's status is moved to `incomplete` and committed.
	pub fn initialize(&mut self) -> Result<()> {
		const PREFIX: &str = "connection.initialize";
		trace_if!(self.tracing(), "{} called", PREFIX);

		if self.is_active() {
			return Err(self.fail(PREFIX, Error::AlreadyActive));
		}

		let api = self.discover().map_err(|err| self.fail(PREFIX, err))?;
		let accepted = api
			.initialize()
			.map_err(|err| self.fail(PREFIX, err.into()))?;

		if !accepted {
			let diagnostic = self.inspector().capture();
			return Err(self.fail(
				PREFIX,
				Error::CallFailed {
					operation: Operation::Initialize,
					diagnostic,
				},
			));
		}

		let code = self.inspector().error_code();
		if code != 0 {
			let diagnostic = self.inspector().explain(code);
			return Err(self.fail(
				PREFIX,
				Error::InconsistentSuccess {
					operation: Operation::Initialize,
					diagnostic,
				},
			));
		}

		self.state = ConnectionState::Active;
		trace_if!(self.tracing(), "{}: connection active (SCORM {})", PREFIX, api.version());

		if self.config.handle_completion_status {
			self.normalize_completion_status();
		}
		Ok(())
	}

	fn normalize_completion_status(&mut self) {
		let Ok(status) = self.status(StatusAction::Get, None) else {
			return;
		};
		if status.is_empty() {
			return;
		}
		if matches!(status.as_str(), "not attempted" | "unknown") {
			let _ = self.status(StatusAction::Set, Some("incomplete"));
		}
		let _ = self.save();
	}

	/// Closes the connection.
	///
	/// With `handle_exit_mode` and no exit status seen yet, the exit field is
	/// written first. Data is always committed before the runtime is told to
	/// terminate; a failed commit keeps the session active.
	pub fn terminate(&mut self) -> Result<()> {
		const PREFIX: &str = "connection.terminate";

		if !self.is_active() {
			return Err(self.fail(
				PREFIX,
				Error::NotActive {
					operation: Operation::Terminate,
				},
			));
		}

		let api = self.discover().map_err(|err| self.fail(PREFIX, err))?;

		if self.config.handle_exit_mode && self.exit_status.as_deref().is_none_or(str::is_empty) {
			let version = api.version();
			let finished = matches!(self.completion_status.as_deref(), Some("completed" | "passed"));
			let value = if finished { version.normal_exit() } else { "suspend" };
			if self.set(version.fields().exit, value).is_err() {
				trace_if!(self.tracing(), "{}: exit mode {:?} was not recorded", PREFIX, value);
			}
		}

		self.save().map_err(|err| self.fail(PREFIX, err))?;

		let finished = api
			.terminate()
			.map_err(|err| self.fail(PREFIX, err.into()))?;
		if !finished {
			let diagnostic = self.inspector().capture();
			return Err(self.fail(
				PREFIX,
				Error::CallFailed {
					operation: Operation::Terminate,
					diagnostic,
				},
			));
		}

		self.state = ConnectionState::Inactive;
		trace_if!(self.tracing(), "{}: connection closed", PREFIX);
		Ok(())
	}
}
