//! Integration tests for the `scorm` binary.
//!
//! Each test writes a fixture to a temporary file and parses the JSON
//! envelope printed on stdout.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use serde_json::{Value, json};
use tempfile::NamedTempFile;

fn scorm_binary() -> PathBuf {
	let mut path = std::env::current_exe().unwrap();
	path.pop();
	path.pop();
	path.push("scorm");
	path
}

fn fixture(value: Value) -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	write!(file, "{value}").unwrap();
	file
}

fn run_scorm(args: &[&str]) -> (bool, Value, String) {
	let output = Command::new(scorm_binary())
		.args(args)
		.env_remove("RUST_LOG")
		.output()
		.expect("failed to execute scorm");
	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let stderr = String::from_utf8_lossy(&output.stderr).to_string();
	let parsed = serde_json::from_str::<Value>(&stdout).unwrap_or_else(|_| json!({ "raw": stdout }));
	(output.status.success(), parsed, stderr)
}

fn path_of(file: &NamedTempFile) -> String {
	file.path().to_string_lossy().to_string()
}

#[test]
fn run_full_2004_session() {
	let file = fixture(json!({
		"lms": { "version": "2004" },
		"placement": { "frameDepth": 2 }
	}));
	let path = path_of(&file);
	let (success, json, stderr) = run_scorm(&[
		"run",
		"--fixture",
		&path,
		"init",
		"status",
		"set:cmi.location=p3",
		"get:cmi.location",
		"status:passed",
		"quit",
	]);

	assert!(success, "command failed: {stderr}");
	assert_eq!(json["ok"], true);
	assert_eq!(json["command"], "run");

	let data = &json["data"];
	assert_eq!(data["version"], "2004");
	assert_eq!(data["active"], false);
	assert_eq!(data["steps"][1]["value"], "incomplete");
	assert_eq!(data["steps"][3]["value"], "p3");
	assert_eq!(data["steps"][4]["value"], "passed");
	assert_eq!(data["runtime"]["phase"], "terminated");
	assert_eq!(data["runtime"]["values"]["cmi.exit"], "normal");
	assert_eq!(data["runtime"]["commits"], 2);
}

#[test]
fn run_reports_failed_steps_and_exits_nonzero() {
	let file = fixture(json!({ "lms": { "version": "1.2" } }));
	let path = path_of(&file);
	let (success, json, _stderr) = run_scorm(&["run", "--fixture", &path, "get:cmi.core.lesson_status", "init", "error"]);

	assert!(!success);
	assert_eq!(json["ok"], false);
	assert_eq!(json["error"]["code"], "STEPS_FAILED");

	let steps = &json["data"]["steps"];
	assert_eq!(steps[0]["ok"], false);
	assert_eq!(steps[0]["error"]["code"], "NOT_ACTIVE");
	assert_eq!(steps[1]["ok"], true);
	assert_eq!(steps[2]["value"]["code"], 0);
	assert_eq!(json["data"]["active"], true);
}

#[test]
fn run_surfaces_runtime_diagnostic() {
	let file = fixture(json!({
		"lms": {
			"version": "2004",
			"faults": { "errorAfterInitialize": 101 }
		}
	}));
	let path = path_of(&file);
	let (success, json, _stderr) = run_scorm(&["run", "--fixture", &path, "init"]);

	assert!(!success);
	let error = &json["data"]["steps"][0]["error"];
	assert_eq!(error["code"], "INCONSISTENT_SUCCESS");
	assert_eq!(error["diagnostic"]["code"], 101);
	assert_eq!(error["diagnostic"]["info"], "General Exception");
}

#[test]
fn run_respects_version_override() {
	let file = fixture(json!({ "lms": { "version": "1.2" } }));
	let path = path_of(&file);
	let (success, json, _stderr) = run_scorm(&["run", "--fixture", &path, "--version", "2004", "init"]);

	assert!(!success);
	assert_eq!(json["data"]["steps"][0]["error"]["code"], "API_NOT_FOUND");
	assert_eq!(json["data"]["version"], "2004");
}

#[test]
fn probe_finds_api_through_opener() {
	let file = fixture(json!({
		"lms": { "version": "1.2" },
		"placement": { "frameDepth": 1, "location": "opener" }
	}));
	let path = path_of(&file);
	let (success, json, stderr) = run_scorm(&["probe", "--fixture", &path]);

	assert!(success, "command failed: {stderr}");
	assert_eq!(json["data"]["found"], true);
	assert_eq!(json["data"]["version"], "1.2");
	assert_eq!(json["data"]["root"], "opener");
}

#[test]
fn probe_without_api_fails() {
	let file = fixture(json!({
		"lms": { "version": "2004" },
		"placement": { "location": "none" }
	}));
	let path = path_of(&file);
	let (success, json, _stderr) = run_scorm(&["probe", "--fixture", &path]);

	assert!(!success);
	assert_eq!(json["ok"], false);
	assert_eq!(json["error"]["code"], "API_NOT_FOUND");
	assert!(json["error"]["details"]["hops"].is_u64());
	assert!(json["error"]["details"]["requested"].is_null());
	assert_eq!(json["data"]["found"], false);
}

#[test]
fn missing_fixture_is_io_error() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("absent.json").to_string_lossy().to_string();
	let (success, json, stderr) = run_scorm(&["run", "--fixture", &path, "init"]);

	assert!(!success);
	assert_eq!(json["error"]["code"], "IO_ERROR");
	assert!(stderr.contains("IO_ERROR"));
}

#[test]
fn invalid_fixture_is_invalid_input() {
	let file = fixture(json!({ "lms": { "version": "3.0" } }));
	let path = path_of(&file);
	let (success, json, _stderr) = run_scorm(&["probe", "--fixture", &path]);

	assert!(!success);
	assert_eq!(json["error"]["code"], "INVALID_INPUT");
}

#[test]
fn text_format_prints_step_lines() {
	let file = fixture(json!({ "lms": { "version": "2004" } }));
	let path = path_of(&file);
	let output = Command::new(scorm_binary())
		.args(["-f", "text", "run", "--fixture", &path, "init", "get:cmi.completion_status"])
		.env("NO_COLOR", "1")
		.output()
		.expect("failed to execute scorm");

	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("init"));
	assert!(stdout.contains("get:cmi.completion_status = \"incomplete\""));
}
