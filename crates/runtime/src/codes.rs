//! Standard error codes reported by the in-memory runtime.

use scorm_protocol::Version;

/// Failure kinds the in-memory runtime can report, independent of version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
	General,
	AlreadyInitialized,
	InstanceTerminated,
	TerminateBeforeInit,
	TerminateAfterTerminate,
	GetBeforeInit,
	GetAfterTerminate,
	SetBeforeInit,
	SetAfterTerminate,
	CommitBeforeInit,
	CommitAfterTerminate,
	InvalidArgument,
	NotInitialized,
	ReadOnly,
}

/// Numeric code for `fault` under `version`.
pub fn code_for(version: Version, fault: Fault) -> u16 {
	match version {
		Version::V2004 => match fault {
			Fault::General => 101,
			Fault::AlreadyInitialized => 103,
			Fault::InstanceTerminated => 104,
			Fault::TerminateBeforeInit => 112,
			Fault::TerminateAfterTerminate => 113,
			Fault::GetBeforeInit => 122,
			Fault::GetAfterTerminate => 123,
			Fault::SetBeforeInit => 132,
			Fault::SetAfterTerminate => 133,
			Fault::CommitBeforeInit => 142,
			Fault::CommitAfterTerminate => 143,
			Fault::InvalidArgument => 201,
			Fault::NotInitialized => 403,
			Fault::ReadOnly => 404,
		},
		Version::V1_2 => match fault {
			Fault::TerminateBeforeInit
			| Fault::GetBeforeInit
			| Fault::SetBeforeInit
			| Fault::CommitBeforeInit => 301,
			Fault::InvalidArgument => 201,
			Fault::NotInitialized => 401,
			Fault::ReadOnly => 403,
			_ => 101,
		},
	}
}

/// Standard error string for `code`, empty when the code is not defined.
pub fn error_string(version: Version, code: u16) -> &'static str {
	match (version, code) {
		(_, 0) => "No Error",
		(_, 101) => "General Exception",
		(Version::V2004, 103) => "Already Initialized",
		(Version::V2004, 104) => "Content Instance Terminated",
		(Version::V2004, 112) => "Termination Before Initialization",
		(Version::V2004, 113) => "Termination After Termination",
		(Version::V2004, 122) => "Retrieve Data Before Initialization",
		(Version::V2004, 123) => "Retrieve Data After Termination",
		(Version::V2004, 132) => "Store Data Before Initialization",
		(Version::V2004, 133) => "Store Data After Termination",
		(Version::V2004, 142) => "Commit Before Initialization",
		(Version::V2004, 143) => "Commit After Termination",
		(Version::V2004, 201) => "General Argument Error",
		(Version::V2004, 403) => "Data Model Element Value Not Initialized",
		(Version::V2004, 404) => "Data Model Element Is Read Only",
		(Version::V1_2, 201) => "Invalid argument error",
		(Version::V1_2, 301) => "Not initialized",
		(Version::V1_2, 401) => "Not implemented error",
		(Version::V1_2, 403) => "Element is read only",
		_ => "",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_codes_follow_version_tables() {
		assert_eq!(code_for(Version::V2004, Fault::GetBeforeInit), 122);
		assert_eq!(code_for(Version::V1_2, Fault::GetBeforeInit), 301);
		assert_eq!(code_for(Version::V1_2, Fault::AlreadyInitialized), 101);
		assert_eq!(error_string(Version::V1_2, 301), "Not initialized");
		assert_eq!(error_string(Version::V2004, 301), "");
	}
}
