use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use scorm_protocol::{ApiObject, Environment, InvokeError, RuntimeValue, Version};

use super::*;
use crate::config::SessionConfig;
use crate::error::{Error, Operation};

/// Echoing runtime that records every method it is asked for.
#[derive(Default)]
struct Script {
	calls: RefCell<Vec<String>>,
	store: RefCell<HashMap<String, String>>,
	last_error: RefCell<String>,
	initialize_result: RefCell<Option<RuntimeValue>>,
	error_after_initialize: RefCell<Option<String>>,
	commit_result: RefCell<Option<RuntimeValue>>,
}

impl Script {
	fn calls(&self) -> Vec<String> {
		self.calls.borrow().clone()
	}
}

impl ApiObject for Script {
	fn invoke(&self, method: &str, args: &[&str]) -> std::result::Result<RuntimeValue, InvokeError> {
		self.calls.borrow_mut().push(method.to_string());
		let ok = RuntimeValue::from("true");
		let result = match method {
			"Initialize" | "LMSInitialize" => {
				if let Some(code) = self.error_after_initialize.borrow().clone() {
					*self.last_error.borrow_mut() = code;
				} else {
					*self.last_error.borrow_mut() = "0".into();
				}
				self.initialize_result.borrow().clone().unwrap_or(ok)
			}
			"Terminate" | "LMSFinish" => ok,
			"Commit" | "LMSCommit" => self.commit_result.borrow().clone().unwrap_or(ok),
			"GetValue" | "LMSGetValue" => {
				let value = self.store.borrow().get(args[0]).cloned().unwrap_or_default();
				RuntimeValue::from(value)
			}
			"SetValue" | "LMSSetValue" => {
				self.store
					.borrow_mut()
					.insert(args[0].to_string(), args[1].to_string());
				ok
			}
			"GetLastError" | "LMSGetLastError" => RuntimeValue::from(self.last_error.borrow().clone()),
			"GetErrorString" | "LMSGetErrorString" => RuntimeValue::from("error string"),
			"GetDiagnostic" | "LMSGetDiagnostic" => RuntimeValue::from("diagnostic"),
			other => return Err(InvokeError::missing_method(other)),
		};
		Ok(result)
	}
}

#[derive(Clone)]
struct Single {
	version: Version,
	api: Rc<Script>,
}

impl Environment for Single {
	fn api(&self, version: Version) -> Option<Rc<dyn ApiObject>> {
		(version == self.version).then(|| self.api.clone() as Rc<dyn ApiObject>)
	}

	fn parent(&self) -> Option<Self> {
		None
	}

	fn opener(&self) -> Option<Self> {
		None
	}

	fn document(&self) -> Option<Self> {
		None
	}

	fn is_same(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.api, &other.api)
	}
}

fn session(version: Version, config: SessionConfig) -> (Session<Single>, Rc<Script>) {
	let api = Rc::new(Script::default());
	let env = Single {
		version,
		api: api.clone(),
	};
	(Session::new(env, config), api)
}

#[test]
fn test_initialize_twice_is_rejected_without_calls() {
	let (mut session, api) = session(Version::V2004, SessionConfig::default());
	session.initialize().unwrap();
	let calls_after_first = api.calls().len();

	assert_eq!(session.initialize(), Err(Error::AlreadyActive));
	assert!(session.is_active());
	assert_eq!(api.calls().len(), calls_after_first);
}

#[test]
fn test_terminate_before_initialize_makes_no_calls() {
	let (mut session, api) = session(Version::V2004, SessionConfig::default());
	assert_eq!(
		session.terminate(),
		Err(Error::NotActive {
			operation: Operation::Terminate
		})
	);
	assert!(api.calls().is_empty());
	assert_eq!(session.version(), None);
}

#[test]
fn test_data_ops_require_active_session() {
	let (mut session, api) = session(Version::V1_2, SessionConfig::default());
	assert!(matches!(
		session.get("cmi.core.lesson_status"),
		Err(Error::NotActive { .. })
	));
	assert!(matches!(session.set("cmi.core.exit", "suspend"), Err(Error::NotActive { .. })));
	assert!(matches!(session.save(), Err(Error::NotActive { .. })));
	assert!(api.calls().is_empty());
}

#[test]
fn test_truthy_initialize_with_error_code_fails() {
	let (mut session, api) = session(Version::V2004, SessionConfig::default());
	*api.error_after_initialize.borrow_mut() = Some("101".into());

	let err = session.initialize().unwrap_err();
	assert!(matches!(
		err,
		Error::InconsistentSuccess {
			operation: Operation::Initialize,
			..
		}
	));
	assert_eq!(err.diagnostic().map(|d| d.code), Some(101));
	assert!(!session.is_active());
}

#[test]
fn test_falsy_initialize_captures_diagnostic() {
	let (mut session, api) = session(Version::V1_2, SessionConfig::default());
	*api.initialize_result.borrow_mut() = Some(RuntimeValue::from("false"));

	let err = session.initialize().unwrap_err();
	let diagnostic = err.diagnostic().cloned().unwrap();
	assert_eq!(diagnostic.info, "error string");
	assert_eq!(diagnostic.diagnostic, "diagnostic");
	assert!(!session.is_active());
}

#[test]
fn test_status_set_without_value_stays_local() {
	let (mut session, api) = session(Version::V2004, SessionConfig::default().with_completion_status(false));
	session.initialize().unwrap();
	let before = api.calls().len();

	assert_eq!(session.status(StatusAction::Set, None), Err(Error::MissingStatusValue));
	assert_eq!(session.status(StatusAction::Set, Some("")), Err(Error::MissingStatusValue));
	assert_eq!(api.calls().len(), before);
}

#[test]
fn test_status_action_parsing() {
	assert_eq!("get".parse::<StatusAction>(), Ok(StatusAction::Get));
	assert_eq!(
		"reset".parse::<StatusAction>(),
		Err(Error::InvalidStatusAction("reset".into()))
	);
}

#[test]
fn test_unknown_status_normalized_for_1_2() {
	let (mut session, api) = session(Version::V1_2, SessionConfig::default());
	api.store
		.borrow_mut()
		.insert("cmi.core.lesson_status".into(), "unknown".into());

	session.initialize().unwrap();

	assert_eq!(session.completion_status(), Some("incomplete"));
	assert_eq!(
		api.store.borrow().get("cmi.core.lesson_status").map(String::as_str),
		Some("incomplete")
	);
	assert!(api.calls().iter().any(|c| c == "LMSCommit"));
}

#[test]
fn test_empty_status_skips_commit() {
	let (mut session, api) = session(Version::V2004, SessionConfig::default());
	session.initialize().unwrap();
	assert_eq!(session.completion_status(), Some(""));
	assert!(!api.calls().iter().any(|c| c == "Commit"));
}

#[test]
fn test_failed_commit_keeps_session_active_on_terminate() {
	let (mut session, api) = session(Version::V2004, SessionConfig::default().with_exit_mode(false));
	session.initialize().unwrap();
	*api.commit_result.borrow_mut() = Some(RuntimeValue::Bool(false));

	let err = session.terminate().unwrap_err();
	assert!(matches!(
		err,
		Error::CallFailed {
			operation: Operation::Commit,
			..
		}
	));
	assert!(session.is_active());
	assert!(!api.calls().iter().any(|c| c == "Terminate"));
}

#[test]
fn test_exit_status_read_suppresses_inference() {
	let (mut session, api) = session(Version::V2004, SessionConfig::default());
	api.store.borrow_mut().insert("cmi.exit".into(), "logout".into());
	session.initialize().unwrap();

	assert_eq!(session.get("cmi.exit").unwrap(), "logout");
	session.terminate().unwrap();

	assert_eq!(api.store.borrow().get("cmi.exit").map(String::as_str), Some("logout"));
	assert!(!session.is_active());
}
