//! JavaScript surface of the SCORM adapter.
//!
//! Content running in a browser gets the classic wrapper calls: booleans for
//! connection and write operations, strings for reads. Failures are traced to
//! the console when `debug` is on.
//!
//! ```js
//! import init, { ScormWrapper } from "scorm_wasm";
//!
//! await init();
//! const scorm = new ScormWrapper({ version: "2004", debug: true });
//! if (scorm.init()) {
//!   scorm.set("cmi.location", "page-3");
//!   scorm.quit();
//! }
//! ```

pub mod console;
pub mod env;

use scorm::{Error, Session, SessionConfig, StatusAction};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use env::{JsApi, JsWindow};

#[wasm_bindgen(start)]
pub fn start() {
	console_error_panic_hook::set_once();
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
	version: Option<&'static str>,
	active: bool,
	completion_status: Option<&'a str>,
	exit_status: Option<&'a str>,
}

/// One session against the runtime API above a window.
#[wasm_bindgen]
pub struct ScormWrapper {
	session: Session<JsWindow>,
}

#[wasm_bindgen]
impl ScormWrapper {
	/// Session rooted at the global `window`. `config` takes the keys
	/// `version`, `handleCompletionStatus`, `handleExitMode` and `debug`.
	#[wasm_bindgen(constructor)]
	pub fn new(config: JsValue) -> Result<ScormWrapper, JsValue> {
		let window = JsWindow::global().ok_or_else(|| JsValue::from_str("no global window"))?;
		Self::with_window(window, config)
	}

	/// Session rooted at an arbitrary window-like object.
	#[wasm_bindgen(js_name = fromWindow)]
	pub fn from_window(window: JsValue, config: JsValue) -> Result<ScormWrapper, JsValue> {
		Self::with_window(JsWindow::new(window), config)
	}

	fn with_window(window: JsWindow, config: JsValue) -> Result<ScormWrapper, JsValue> {
		let config = parse_config(config)?;
		if config.debug {
			console::install();
		}
		Ok(Self {
			session: Session::new(window, config),
		})
	}

	pub fn init(&mut self) -> bool {
		self.session.initialize().is_ok()
	}

	pub fn initialize(&mut self) -> bool {
		self.init()
	}

	pub fn quit(&mut self) -> bool {
		self.session.terminate().is_ok()
	}

	pub fn terminate(&mut self) -> bool {
		self.quit()
	}

	/// Element value; `""` when the runtime rejects the read and `"null"`
	/// when there is no active connection. Exceptions raised by the runtime
	/// object are rethrown.
	pub fn get(&mut self, field: &str) -> Result<String, JsValue> {
		match self.session.get(field) {
			Ok(value) => Ok(value),
			Err(Error::NotActive { .. } | Error::ApiNotFound { .. }) => Ok("null".to_string()),
			Err(Error::Invoke(err)) => Err(js_sys::Error::new(&err.to_string()).into()),
			Err(_) => Ok(String::new()),
		}
	}

	pub fn set(&mut self, field: &str, value: &str) -> bool {
		self.session.set(field, value).is_ok()
	}

	pub fn save(&mut self) -> bool {
		self.session.save().is_ok()
	}

	/// `get` returns the status like [`get`](Self::get); `set` returns
	/// `"true"` or `"false"`.
	pub fn status(&mut self, action: &str, value: Option<String>) -> Result<String, JsValue> {
		match action.parse::<StatusAction>() {
			Ok(StatusAction::Get) => self.get(self.status_field()),
			Ok(StatusAction::Set) => Ok(self
				.session
				.status(StatusAction::Set, value.as_deref())
				.is_ok()
				.to_string()),
			Err(_) => Ok("false".to_string()),
		}
	}

	#[wasm_bindgen(js_name = debugGetCode)]
	pub fn debug_get_code(&mut self) -> i32 {
		self.session.last_error_code()
	}

	#[wasm_bindgen(js_name = debugGetInfo)]
	pub fn debug_get_info(&mut self, code: i32) -> String {
		self.session.error_info(code)
	}

	#[wasm_bindgen(js_name = debugGetDiagnosticInfo)]
	pub fn debug_get_diagnostic_info(&mut self, code: i32) -> String {
		self.session.diagnostic_info(code)
	}

	#[wasm_bindgen(getter)]
	pub fn version(&self) -> Option<String> {
		self.session.version().map(|v| v.to_string())
	}

	#[wasm_bindgen(getter, js_name = isActive)]
	pub fn is_active(&self) -> bool {
		self.session.is_active()
	}

	/// Plain object with the pinned version, connection state and cached
	/// status fields.
	pub fn snapshot(&self) -> Result<JsValue, JsValue> {
		let snapshot = Snapshot {
			version: self.session.version().map(|v| v.as_str()),
			active: self.session.is_active(),
			completion_status: self.session.completion_status(),
			exit_status: self.session.exit_status(),
		};
		serde_wasm_bindgen::to_value(&snapshot).map_err(Into::into)
	}
}

impl ScormWrapper {
	/// Status field name for the pinned version; empty before discovery.
	fn status_field(&self) -> &'static str {
		self.session.version().map(|v| v.fields().status).unwrap_or_default()
	}

	pub fn session(&self) -> &Session<JsWindow> {
		&self.session
	}
}

fn parse_config(config: JsValue) -> Result<SessionConfig, JsValue> {
	if config.is_undefined() || config.is_null() {
		return Ok(SessionConfig::default());
	}
	serde_wasm_bindgen::from_value(config).map_err(Into::into)
}
