//! Scriptable in-memory runtime API object.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use scorm_protocol::{ApiObject, InvokeError, RuntimeValue, Version};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::codes::{Fault, code_for, error_string};

/// Lifecycle of the runtime side of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
	#[default]
	NotInitialized,
	Running,
	Terminated,
}

/// Overrides applied on top of the runtime's normal behaviour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faults {
	/// Value returned by initialize instead of `"true"`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub initialize: Option<RuntimeValue>,
	/// Value returned by terminate instead of `"true"`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub terminate: Option<RuntimeValue>,
	/// Value returned by commit instead of `"true"`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub commit: Option<RuntimeValue>,
	/// Error code left behind by an initialize that reports success.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error_after_initialize: Option<u16>,
	/// Raw value returned by the last-error method instead of the real code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_error: Option<RuntimeValue>,
	/// Elements that reject writes as read-only.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub read_only: Vec<String>,
}

/// One method invocation seen by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedCall {
	pub method: String,
	pub args: Vec<String>,
}

#[derive(Debug, Default)]
struct LmsState {
	phase: Phase,
	store: BTreeMap<String, String>,
	last_error: u16,
	diagnostic: String,
	commits: usize,
	calls: Vec<RecordedCall>,
	faults: Faults,
}

impl LmsState {
	fn ok(&mut self) {
		self.last_error = 0;
		self.diagnostic.clear();
	}

	fn fail(&mut self, version: Version, fault: Fault, diagnostic: impl Into<String>) {
		self.last_error = code_for(version, fault);
		self.diagnostic = diagnostic.into();
	}

	/// Phase check shared by get, set and commit.
	fn require_running(&mut self, version: Version, before: Fault, after: Fault) -> bool {
		match self.phase {
			Phase::Running => true,
			Phase::NotInitialized => {
				self.fail(version, before, "the connection has not been initialized");
				false
			}
			Phase::Terminated => {
				self.fail(version, after, "the connection has been terminated");
				false
			}
		}
	}
}

/// In-memory runtime API object for one protocol version.
///
/// Clones share state, so a test can keep one clone to inspect the journal
/// while the session under test holds another.
#[derive(Debug, Clone)]
pub struct MemoryLms {
	version: Version,
	state: Rc<RefCell<LmsState>>,
}

impl MemoryLms {
	/// Runtime with the status element seeded the way a fresh attempt starts.
	pub fn new(version: Version) -> Self {
		let initial = match version {
			Version::V1_2 => "not attempted",
			Version::V2004 => "unknown",
		};
		Self::empty(version).with_value(version.fields().status, initial)
	}

	/// Runtime with an empty data model.
	pub fn empty(version: Version) -> Self {
		Self {
			version,
			state: Rc::new(RefCell::new(LmsState::default())),
		}
	}

	pub fn with_value(self, field: &str, value: &str) -> Self {
		self.state
			.borrow_mut()
			.store
			.insert(field.to_string(), value.to_string());
		self
	}

	pub fn with_faults(self, faults: Faults) -> Self {
		self.state.borrow_mut().faults = faults;
		self
	}

	/// Mutates the fault overrides in place.
	pub fn update_faults(&self, update: impl FnOnce(&mut Faults)) {
		update(&mut self.state.borrow_mut().faults);
	}

	pub fn version(&self) -> Version {
		self.version
	}

	pub fn phase(&self) -> Phase {
		self.state.borrow().phase
	}

	pub fn value(&self, field: &str) -> Option<String> {
		self.state.borrow().store.get(field).cloned()
	}

	pub fn values(&self) -> BTreeMap<String, String> {
		self.state.borrow().store.clone()
	}

	pub fn commits(&self) -> usize {
		self.state.borrow().commits
	}

	pub fn calls(&self) -> Vec<RecordedCall> {
		self.state.borrow().calls.clone()
	}

	/// Method names in call order.
	pub fn methods(&self) -> Vec<String> {
		self.state
			.borrow()
			.calls
			.iter()
			.map(|c| c.method.clone())
			.collect()
	}

	pub fn clear_calls(&self) {
		self.state.borrow_mut().calls.clear();
	}

	/// Shares this runtime as a host API object.
	pub fn as_api(&self) -> Rc<dyn ApiObject> {
		Rc::new(self.clone())
	}

	fn initialize(&self, state: &mut LmsState, arg: &str) -> RuntimeValue {
		let version = self.version;
		if !arg.is_empty() {
			state.fail(version, Fault::InvalidArgument, "initialize expects an empty string");
			return RuntimeValue::from("false");
		}
		match state.phase {
			Phase::Running => {
				state.fail(version, Fault::AlreadyInitialized, "already initialized");
				return RuntimeValue::from("false");
			}
			Phase::Terminated => {
				state.fail(version, Fault::InstanceTerminated, "instance terminated");
				return RuntimeValue::from("false");
			}
			Phase::NotInitialized => {}
		}

		if let Some(forced) = state.faults.initialize.clone() {
			if !forced.truthy() {
				state.fail(version, Fault::General, "initialize refused by fault script");
				return forced;
			}
		}

		state.phase = Phase::Running;
		state.ok();
		if let Some(code) = state.faults.error_after_initialize {
			state.last_error = code;
			state.diagnostic = "error left by fault script".to_string();
		}
		state
			.faults
			.initialize
			.clone()
			.unwrap_or_else(|| RuntimeValue::from("true"))
	}

	fn terminate(&self, state: &mut LmsState) -> RuntimeValue {
		let version = self.version;
		match state.phase {
			Phase::NotInitialized => {
				state.fail(version, Fault::TerminateBeforeInit, "terminate before initialize");
				return RuntimeValue::from("false");
			}
			Phase::Terminated => {
				state.fail(version, Fault::TerminateAfterTerminate, "already terminated");
				return RuntimeValue::from("false");
			}
			Phase::Running => {}
		}

		if let Some(forced) = state.faults.terminate.clone() {
			if !forced.truthy() {
				state.fail(version, Fault::General, "terminate refused by fault script");
				return forced;
			}
		}

		state.phase = Phase::Terminated;
		state.ok();
		RuntimeValue::from("true")
	}

	fn get_value(&self, state: &mut LmsState, field: &str) -> RuntimeValue {
		let version = self.version;
		if !state.require_running(version, Fault::GetBeforeInit, Fault::GetAfterTerminate) {
			return RuntimeValue::from("");
		}
		if field.is_empty() {
			state.fail(version, Fault::InvalidArgument, "no element name given");
			return RuntimeValue::from("");
		}
		match state.store.get(field).cloned() {
			Some(value) => {
				state.ok();
				RuntimeValue::from(value)
			}
			None => {
				state.fail(version, Fault::NotInitialized, format!("{field} has no value"));
				RuntimeValue::from("")
			}
		}
	}

	fn set_value(&self, state: &mut LmsState, field: &str, value: &str) -> RuntimeValue {
		let version = self.version;
		if !state.require_running(version, Fault::SetBeforeInit, Fault::SetAfterTerminate) {
			return RuntimeValue::from("false");
		}
		if field.is_empty() {
			state.fail(version, Fault::InvalidArgument, "no element name given");
			return RuntimeValue::from("false");
		}
		if state.faults.read_only.iter().any(|f| f == field) {
			state.fail(version, Fault::ReadOnly, format!("{field} is read only"));
			return RuntimeValue::from("false");
		}
		state.store.insert(field.to_string(), value.to_string());
		state.ok();
		RuntimeValue::from("true")
	}

	fn commit(&self, state: &mut LmsState, arg: &str) -> RuntimeValue {
		let version = self.version;
		if !arg.is_empty() {
			state.fail(version, Fault::InvalidArgument, "commit expects an empty string");
			return RuntimeValue::from("false");
		}
		if !state.require_running(version, Fault::CommitBeforeInit, Fault::CommitAfterTerminate) {
			return RuntimeValue::from("false");
		}
		if let Some(forced) = state.faults.commit.clone() {
			if !forced.truthy() {
				state.fail(version, Fault::General, "commit refused by fault script");
				return forced;
			}
		}
		state.commits += 1;
		state.ok();
		RuntimeValue::from("true")
	}
}

fn arg<'a>(args: &[&'a str], index: usize) -> &'a str {
	args.get(index).copied().unwrap_or("")
}

impl ApiObject for MemoryLms {
	fn invoke(&self, method: &str, args: &[&str]) -> Result<RuntimeValue, InvokeError> {
		let names = self.version.methods();
		let mut state = self.state.borrow_mut();
		state.calls.push(RecordedCall {
			method: method.to_string(),
			args: args.iter().map(|a| a.to_string()).collect(),
		});
		trace!(target: "scorm_runtime", version = %self.version, method, ?args, "runtime call");

		let value = if method == names.initialize {
			self.initialize(&mut state, arg(args, 0))
		} else if method == names.terminate {
			self.terminate(&mut state)
		} else if method == names.get_value {
			self.get_value(&mut state, arg(args, 0))
		} else if method == names.set_value {
			self.set_value(&mut state, arg(args, 0), arg(args, 1))
		} else if method == names.commit {
			self.commit(&mut state, arg(args, 0))
		} else if method == names.get_last_error {
			match &state.faults.last_error {
				Some(raw) => raw.clone(),
				None => RuntimeValue::from(state.last_error.to_string()),
			}
		} else if method == names.get_error_string {
			let code = arg(args, 0).parse::<u16>().unwrap_or(u16::MAX);
			RuntimeValue::from(error_string(self.version, code))
		} else if method == names.get_diagnostic {
			let requested = arg(args, 0).parse::<u16>().ok();
			if requested == Some(state.last_error) {
				RuntimeValue::from(state.diagnostic.clone())
			} else {
				RuntimeValue::from("")
			}
		} else {
			return Err(InvokeError::missing_method(method));
		};
		Ok(value)
	}

	fn describe(&self) -> String {
		format!("[MemoryLms SCORM {}]", self.version)
	}
}
