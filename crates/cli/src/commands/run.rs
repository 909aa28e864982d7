//! `scorm run`: a scripted session against a fixture.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use scorm::{ErrorDiagnostic, Session, StatusAction, Version};
use scorm_runtime::{Phase, Window};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use super::load_fixture;
use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use crate::output::{self, ErrorCode, OutputFormat, ResultBuilder, TextRender, status_marker};

/// One session operation requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
	Init,
	Quit,
	Save,
	Get(String),
	Set { field: String, value: String },
	/// Read the status field, or write it when a value is given.
	Status(Option<String>),
	/// Last error code with its error string and diagnostic.
	Error,
}

impl FromStr for Step {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		let (name, rest) = match s.split_once(':') {
			Some((name, rest)) => (name, Some(rest)),
			None => (s, None),
		};
		match (name, rest) {
			("init", None) => Ok(Step::Init),
			("quit", None) => Ok(Step::Quit),
			("save", None) => Ok(Step::Save),
			("error", None) => Ok(Step::Error),
			("status", None) => Ok(Step::Status(None)),
			("status", Some(value)) => Ok(Step::Status(Some(value.to_string()))),
			("get", Some(field)) if !field.is_empty() => Ok(Step::Get(field.to_string())),
			("set", Some(assignment)) => match assignment.split_once('=') {
				Some((field, value)) if !field.is_empty() => Ok(Step::Set {
					field: field.to_string(),
					value: value.to_string(),
				}),
				_ => Err(format!("expected set:<field>=<value>, got {s:?}")),
			},
			_ => Err(format!("unknown step {s:?}")),
		}
	}
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Step::Init => f.write_str("init"),
			Step::Quit => f.write_str("quit"),
			Step::Save => f.write_str("save"),
			Step::Error => f.write_str("error"),
			Step::Get(field) => write!(f, "get:{field}"),
			Step::Set { field, value } => write!(f, "set:{field}={value}"),
			Step::Status(None) => f.write_str("status"),
			Step::Status(Some(value)) => write!(f, "status:{value}"),
		}
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFailure {
	pub code: &'static str,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub diagnostic: Option<ErrorDiagnostic>,
}

impl From<scorm::Error> for StepFailure {
	fn from(err: scorm::Error) -> Self {
		Self {
			code: err.code(),
			message: err.to_string(),
			diagnostic: err.diagnostic().cloned(),
		}
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
	pub step: String,
	pub ok: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<StepFailure>,
}

/// Runtime state after the last step.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSnapshot {
	pub phase: Phase,
	pub commits: usize,
	pub values: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunData {
	pub version: Option<Version>,
	pub active: bool,
	pub steps: Vec<StepRecord>,
	pub runtime: RuntimeSnapshot,
}

impl RunData {
	pub fn failed(&self) -> usize {
		self.steps.iter().filter(|s| !s.ok).count()
	}
}

impl TextRender for RunData {
	fn render(&self, out: &mut dyn Write) -> io::Result<()> {
		for record in &self.steps {
			write!(out, "{}  {}", status_marker(record.ok), record.step)?;
			if let Some(value) = &record.value {
				write!(out, " = {value}")?;
			}
			if let Some(error) = &record.error {
				write!(out, "  {}: {}", error.code, error.message)?;
			}
			writeln!(out)?;
		}
		let version = self.version.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
		writeln!(
			out,
			"SCORM {version}, session {}, runtime {:?}, {} commit(s)",
			if self.active { "active" } else { "inactive" },
			self.runtime.phase,
			self.runtime.commits
		)
	}
}

/// Applies one step to the session.
pub fn apply(session: &mut Session<Window>, step: &Step) -> scorm::Result<Option<Value>> {
	match step {
		Step::Init => session.initialize().map(|()| None),
		Step::Quit => session.terminate().map(|()| None),
		Step::Save => session.save().map(|()| None),
		Step::Get(field) => session.get(field).map(|v| Some(Value::String(v))),
		Step::Set { field, value } => session.set(field, value).map(|()| None),
		Step::Status(None) => session
			.status(StatusAction::Get, None)
			.map(|v| Some(Value::String(v))),
		Step::Status(Some(value)) => session
			.status(StatusAction::Set, Some(value.as_str()))
			.map(|v| Some(Value::String(v))),
		Step::Error => {
			let code = session.last_error_code();
			Ok(Some(json!({
				"code": code,
				"info": session.error_info(code),
				"diagnostic": session.diagnostic_info(code),
			})))
		}
	}
}

pub fn execute(args: RunArgs, format: OutputFormat) -> Result<()> {
	let fixture = load_fixture(&args.session.fixture)?;
	let staged = fixture.build();
	let mut session = Session::new(staged.content.clone(), args.session.config());

	let steps: Vec<StepRecord> = args
		.steps
		.iter()
		.map(|step| {
			let outcome = apply(&mut session, step);
			info!(target: "scorm_cli", step = %step, ok = outcome.is_ok(), "step finished");
			match outcome {
				Ok(value) => StepRecord {
					step: step.to_string(),
					ok: true,
					value,
					error: None,
				},
				Err(err) => StepRecord {
					step: step.to_string(),
					ok: false,
					value: None,
					error: Some(err.into()),
				},
			}
		})
		.collect();

	let data = RunData {
		version: session.version(),
		active: session.is_active(),
		steps,
		runtime: RuntimeSnapshot {
			phase: staged.lms.phase(),
			commits: staged.lms.commits(),
			values: staged.lms.values(),
		},
	};

	let failed = data.failed();
	let total = data.steps.len();
	let builder = ResultBuilder::new("run");
	let builder = if failed > 0 {
		builder.error(ErrorCode::StepsFailed, format!("{failed} of {total} step(s) failed"))
	} else {
		builder
	};
	output::print_result(&builder.data(data).build(), format);

	if failed > 0 {
		return Err(CliError::OutputAlreadyPrinted);
	}
	Ok(())
}
