//! Browser windows and runtime objects behind the protocol traits.

use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use scorm::{ApiObject, Environment, InvokeError, RuntimeValue, Version};
use wasm_bindgen::{JsCast, JsValue};

/// A browser window (or any object shaped like one).
///
/// Property reads that throw, which is what cross-origin frames do, are
/// treated as absent.
#[derive(Clone, Debug)]
pub struct JsWindow(JsValue);

impl JsWindow {
	pub fn new(value: JsValue) -> Self {
		Self(value)
	}

	/// The global `window`, when running on a page.
	pub fn global() -> Option<Self> {
		web_sys::window().map(|window| Self(window.into()))
	}

	pub fn as_js(&self) -> &JsValue {
		&self.0
	}

	fn property(&self, name: &str) -> Option<JsValue> {
		Reflect::get(&self.0, &JsValue::from_str(name))
			.ok()
			.filter(|value| !value.is_null() && !value.is_undefined())
	}

	fn context(&self, name: &str) -> Option<Self> {
		self.property(name).filter(JsValue::is_object).map(Self)
	}
}

impl Environment for JsWindow {
	fn api(&self, version: Version) -> Option<Rc<dyn ApiObject>> {
		self.property(version.property())
			.filter(JsValue::is_object)
			.map(|object| Rc::new(JsApi::new(object)) as Rc<dyn ApiObject>)
	}

	fn parent(&self) -> Option<Self> {
		self.context("parent")
	}

	fn top(&self) -> Option<Self> {
		self.context("top")
	}

	fn opener(&self) -> Option<Self> {
		self.context("opener")
	}

	fn document(&self) -> Option<Self> {
		self.context("document")
	}

	fn is_same(&self, other: &Self) -> bool {
		Object::is(&self.0, &other.0)
	}
}

/// Runtime API object found on a window.
pub struct JsApi {
	object: JsValue,
}

impl JsApi {
	pub fn new(object: JsValue) -> Self {
		Self { object }
	}
}

impl ApiObject for JsApi {
	fn invoke(&self, method: &str, args: &[&str]) -> Result<RuntimeValue, InvokeError> {
		let member = Reflect::get(&self.object, &JsValue::from_str(method))
			.map_err(|err| InvokeError::new(method, describe_error(&err)))?;
		let function = member
			.dyn_into::<Function>()
			.map_err(|_| InvokeError::missing_method(method))?;

		let js_args: Array = args.iter().map(|arg| JsValue::from_str(arg)).collect();
		let result = function
			.apply(&self.object, &js_args)
			.map_err(|err| InvokeError::new(method, describe_error(&err)))?;
		Ok(runtime_value(&result))
	}

	fn describe(&self) -> String {
		js_string(&self.object)
	}
}

/// JS value as returned by a runtime method.
pub fn runtime_value(value: &JsValue) -> RuntimeValue {
	if let Some(flag) = value.as_bool() {
		RuntimeValue::Bool(flag)
	} else if let Some(number) = value.as_f64() {
		RuntimeValue::Number(number)
	} else if let Some(text) = value.as_string() {
		RuntimeValue::String(text)
	} else if value.is_null() {
		RuntimeValue::Null
	} else if value.is_undefined() {
		RuntimeValue::Undefined
	} else {
		RuntimeValue::String(js_string(value))
	}
}

/// `String(value)` for objects.
fn js_string(value: &JsValue) -> String {
	value.unchecked_ref::<Object>().to_string().into()
}

fn describe_error(err: &JsValue) -> String {
	if let Some(text) = err.as_string() {
		return text;
	}
	match err.dyn_ref::<js_sys::Error>() {
		Some(error) => error.message().into(),
		None => js_string(err),
	}
}
