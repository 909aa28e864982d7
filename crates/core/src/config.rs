//! Caller-supplied session configuration.

use scorm_protocol::Version;
use serde::{Deserialize, Serialize};

/// Knobs a caller sets before the session first talks to the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
	/// Only accept the API object of this version during discovery.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<Version>,
	/// Rewrite `not attempted`/`unknown` status to `incomplete` on initialize.
	#[serde(default = "enabled")]
	pub handle_completion_status: bool,
	/// Infer the exit field on terminate when the caller never set it.
	#[serde(default = "enabled")]
	pub handle_exit_mode: bool,
	/// Emit trace output for every operation.
	#[serde(default)]
	pub debug: bool,
}

fn enabled() -> bool {
	true
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			version: None,
			handle_completion_status: true,
			handle_exit_mode: true,
			debug: false,
		}
	}
}

impl SessionConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_version(mut self, version: Version) -> Self {
		self.version = Some(version);
		self
	}

	pub fn with_completion_status(mut self, enabled: bool) -> Self {
		self.handle_completion_status = enabled;
		self
	}

	pub fn with_exit_mode(mut self, enabled: bool) -> Self {
		self.handle_exit_mode = enabled;
		self
	}

	pub fn with_debug(mut self, enabled: bool) -> Self {
		self.debug = enabled;
		self
	}
}
