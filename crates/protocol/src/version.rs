//! Protocol versions and their name bindings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Protocol variant exposed by a runtime API object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
	/// SCORM 1.2, exposed as `window.API`.
	#[serde(rename = "1.2")]
	V1_2,
	/// SCORM 2004, exposed as `window.API_1484_11`.
	#[serde(rename = "2004")]
	V2004,
}

/// Method names a runtime object answers to for one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodBindings {
	pub initialize: &'static str,
	pub terminate: &'static str,
	pub get_value: &'static str,
	pub set_value: &'static str,
	pub commit: &'static str,
	pub get_last_error: &'static str,
	pub get_error_string: &'static str,
	pub get_diagnostic: &'static str,
}

/// Data model fields whose names differ between versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldNames {
	/// Learner progress (`lesson_status` / `completion_status`).
	pub status: &'static str,
	/// How the attempt ended.
	pub exit: &'static str,
}

const V1_2_METHODS: MethodBindings = MethodBindings {
	initialize: "LMSInitialize",
	terminate: "LMSFinish",
	get_value: "LMSGetValue",
	set_value: "LMSSetValue",
	commit: "LMSCommit",
	get_last_error: "LMSGetLastError",
	get_error_string: "LMSGetErrorString",
	get_diagnostic: "LMSGetDiagnostic",
};

const V2004_METHODS: MethodBindings = MethodBindings {
	initialize: "Initialize",
	terminate: "Terminate",
	get_value: "GetValue",
	set_value: "SetValue",
	commit: "Commit",
	get_last_error: "GetLastError",
	get_error_string: "GetErrorString",
	get_diagnostic: "GetDiagnostic",
};

const V1_2_FIELDS: FieldNames = FieldNames {
	status: "cmi.core.lesson_status",
	exit: "cmi.core.exit",
};

const V2004_FIELDS: FieldNames = FieldNames {
	status: "cmi.completion_status",
	exit: "cmi.exit",
};

impl Version {
	/// All versions, in discovery preference order.
	pub const PREFERENCE: [Version; 2] = [Version::V2004, Version::V1_2];

	/// Property name under which a context exposes this version's API object.
	pub fn property(self) -> &'static str {
		match self {
			Version::V1_2 => "API",
			Version::V2004 => "API_1484_11",
		}
	}

	pub fn methods(self) -> &'static MethodBindings {
		match self {
			Version::V1_2 => &V1_2_METHODS,
			Version::V2004 => &V2004_METHODS,
		}
	}

	pub fn fields(self) -> &'static FieldNames {
		match self {
			Version::V1_2 => &V1_2_FIELDS,
			Version::V2004 => &V2004_FIELDS,
		}
	}

	/// Exit value written when a finished attempt is terminated.
	pub fn normal_exit(self) -> &'static str {
		match self {
			Version::V1_2 => "logout",
			Version::V2004 => "normal",
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Version::V1_2 => "1.2",
			Version::V2004 => "2004",
		}
	}
}

/// True for either version's status field name.
pub fn is_status_field(field: &str) -> bool {
	field == V1_2_FIELDS.status || field == V2004_FIELDS.status
}

/// True for either version's exit field name.
pub fn is_exit_field(field: &str) -> bool {
	field == V1_2_FIELDS.exit || field == V2004_FIELDS.exit
}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Version string other than `1.2` or `2004`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown SCORM version: {0}")]
pub struct ParseVersionError(pub String);

impl FromStr for Version {
	type Err = ParseVersionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"1.2" => Ok(Version::V1_2),
			"2004" => Ok(Version::V2004),
			other => Err(ParseVersionError(other.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_bindings_differ_per_version() {
		assert_eq!(Version::V1_2.methods().terminate, "LMSFinish");
		assert_eq!(Version::V2004.methods().terminate, "Terminate");
		assert_eq!(Version::V1_2.fields().status, "cmi.core.lesson_status");
		assert_eq!(Version::V2004.fields().exit, "cmi.exit");
	}

	#[test]
	fn test_version_serde_uses_standard_names() {
		assert_eq!(serde_json::to_string(&Version::V2004).unwrap(), "\"2004\"");
		let parsed: Version = serde_json::from_str("\"1.2\"").unwrap();
		assert_eq!(parsed, Version::V1_2);
		assert_eq!("2004".parse::<Version>().unwrap(), Version::V2004);
		assert_eq!(
			"3".parse::<Version>().unwrap_err().to_string(),
			"unknown SCORM version: 3"
		);
	}

	#[test]
	fn test_field_classification_spans_versions() {
		assert!(is_status_field("cmi.core.lesson_status"));
		assert!(is_status_field("cmi.completion_status"));
		assert!(is_exit_field("cmi.core.exit"));
		assert!(!is_exit_field("cmi.suspend_data"));
	}
}
