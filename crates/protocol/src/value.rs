//! Values returned by runtime API methods.
//!
//! Runtime objects are loosely typed: a call documented as returning
//! `"true"` may hand back a boolean, a number or a string depending on the
//! host. [`RuntimeValue`] keeps what the host returned and applies the
//! coercions the adapter relies on.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

/// Error code reported when the runtime's last-error value is not numeric.
///
/// Any non-zero code counts as "errored", so an unreadable code never passes
/// the success double-check.
pub const UNPARSEABLE_ERROR_CODE: i32 = -1;

static TRUTHY_STRING: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)(true|1)").expect("static regex compiles"));

/// Raw return value of a runtime method call.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum RuntimeValue {
	Bool(bool),
	Number(f64),
	String(String),
	Null,
	#[default]
	Undefined,
}

impl RuntimeValue {
	/// Boolean reading of a "string-coercible boolean" return.
	///
	/// Strings are truthy when they contain `true` (any case) or `1`.
	pub fn truthy(&self) -> bool {
		match self {
			RuntimeValue::Bool(b) => *b,
			RuntimeValue::Number(n) => *n != 0.0 && !n.is_nan(),
			RuntimeValue::String(s) => TRUTHY_STRING.is_match(s),
			RuntimeValue::Null | RuntimeValue::Undefined => false,
		}
	}

	/// String rendering of the value as the host language would print it.
	pub fn to_runtime_string(&self) -> String {
		match self {
			RuntimeValue::Bool(b) => b.to_string(),
			RuntimeValue::Number(n) => format_number(*n),
			RuntimeValue::String(s) => s.clone(),
			RuntimeValue::Null => "null".to_string(),
			RuntimeValue::Undefined => "undefined".to_string(),
		}
	}

	/// Returns the inner string for string values.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			RuntimeValue::String(s) => Some(s),
			_ => None,
		}
	}
}

fn format_number(n: f64) -> String {
	if n.is_nan() {
		"NaN".to_string()
	} else if n.is_infinite() {
		let sign = if n > 0.0 { "" } else { "-" };
		format!("{sign}Infinity")
	} else if n.fract() == 0.0 && n.abs() < 1e21 {
		format!("{}", n as i64)
	} else {
		n.to_string()
	}
}

impl fmt::Display for RuntimeValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_runtime_string())
	}
}

impl From<bool> for RuntimeValue {
	fn from(b: bool) -> Self {
		RuntimeValue::Bool(b)
	}
}

impl From<&str> for RuntimeValue {
	fn from(s: &str) -> Self {
		RuntimeValue::String(s.to_string())
	}
}

impl From<String> for RuntimeValue {
	fn from(s: String) -> Self {
		RuntimeValue::String(s)
	}
}

impl From<serde_json::Value> for RuntimeValue {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => RuntimeValue::Null,
			serde_json::Value::Bool(b) => RuntimeValue::Bool(b),
			serde_json::Value::Number(n) => RuntimeValue::Number(n.as_f64().unwrap_or(f64::NAN)),
			serde_json::Value::String(s) => RuntimeValue::String(s),
			other => RuntimeValue::String(other.to_string()),
		}
	}
}

impl Serialize for RuntimeValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			RuntimeValue::Bool(b) => serializer.serialize_bool(*b),
			RuntimeValue::Number(n) => serializer.serialize_f64(*n),
			RuntimeValue::String(s) => serializer.serialize_str(s),
			RuntimeValue::Null | RuntimeValue::Undefined => serializer.serialize_none(),
		}
	}
}

/// Parses an error code the way `parseInt(s, 10)` does.
///
/// Leading whitespace and an optional sign are accepted, then the longest run
/// of decimal digits. Returns `None` when no digit is found.
pub fn parse_error_code(raw: &str) -> Option<i32> {
	let trimmed = raw.trim_start();
	let (negative, rest) = match trimmed.as_bytes().first() {
		Some(b'-') => (true, &trimmed[1..]),
		Some(b'+') => (false, &trimmed[1..]),
		_ => (false, trimmed),
	};
	let digits_end = rest
		.char_indices()
		.find(|(_, c)| !c.is_ascii_digit())
		.map(|(i, _)| i)
		.unwrap_or(rest.len());
	if digits_end == 0 {
		return None;
	}
	let magnitude: i64 = rest[..digits_end].parse().ok()?;
	let signed = if negative { -magnitude } else { magnitude };
	i32::try_from(signed).ok()
}
