//! Version-tagged runtime API handle.

use std::fmt;
use std::rc::Rc;

use scorm_protocol::{ApiObject, InvokeError, RuntimeValue, Version};

/// Discovered runtime API object bound to one protocol version.
///
/// The version is fixed when the handle is created by the locator; every call
/// goes through that version's method bindings.
#[derive(Clone)]
pub struct RuntimeApi {
	version: Version,
	object: Rc<dyn ApiObject>,
}

impl RuntimeApi {
	pub fn new(version: Version, object: Rc<dyn ApiObject>) -> Self {
		Self { version, object }
	}

	pub fn version(&self) -> Version {
		self.version
	}

	/// Returns true if both handles wrap the same host object.
	pub fn same_object(&self, other: &RuntimeApi) -> bool {
		Rc::ptr_eq(&self.object, &other.object)
	}

	fn call(&self, method: &str, args: &[&str]) -> Result<RuntimeValue, InvokeError> {
		self.object.invoke(method, args)
	}

	/// `Initialize("")` / `LMSInitialize("")`, coerced to a boolean.
	pub fn initialize(&self) -> Result<bool, InvokeError> {
		Ok(self.call(self.version.methods().initialize, &[""])?.truthy())
	}

	/// `Terminate("")` / `LMSFinish("")`, coerced to a boolean.
	pub fn terminate(&self) -> Result<bool, InvokeError> {
		Ok(self.call(self.version.methods().terminate, &[""])?.truthy())
	}

	/// `GetValue(field)` / `LMSGetValue(field)` as a string.
	pub fn get_value(&self, field: &str) -> Result<String, InvokeError> {
		Ok(self
			.call(self.version.methods().get_value, &[field])?
			.to_runtime_string())
	}

	/// `SetValue(field, value)` / `LMSSetValue(field, value)`, coerced to a boolean.
	pub fn set_value(&self, field: &str, value: &str) -> Result<bool, InvokeError> {
		Ok(self
			.call(self.version.methods().set_value, &[field, value])?
			.truthy())
	}

	/// `Commit("")` / `LMSCommit("")`, coerced to a boolean.
	pub fn commit(&self) -> Result<bool, InvokeError> {
		Ok(self.call(self.version.methods().commit, &[""])?.truthy())
	}

	/// Raw last-error value, unparsed.
	pub fn last_error(&self) -> Result<String, InvokeError> {
		Ok(self
			.call(self.version.methods().get_last_error, &[])?
			.to_runtime_string())
	}

	pub fn error_string(&self, code: i32) -> Result<String, InvokeError> {
		let code = code.to_string();
		Ok(self
			.call(self.version.methods().get_error_string, &[&code])?
			.to_runtime_string())
	}

	pub fn diagnostic(&self, code: i32) -> Result<String, InvokeError> {
		let code = code.to_string();
		Ok(self
			.call(self.version.methods().get_diagnostic, &[&code])?
			.to_runtime_string())
	}
}

impl fmt::Debug for RuntimeApi {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RuntimeApi")
			.field("version", &self.version)
			.field("object", &self.object.describe())
			.finish()
	}
}
