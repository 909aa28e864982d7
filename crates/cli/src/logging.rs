use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

pub fn init_logging(verbosity: u8, session_trace: bool) {
	let filter = directives(verbosity, session_trace);
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}

/// Filter directives for a verbosity count.
///
/// 0 = errors only, 1 (-v) = runtime fixture events, 2+ (-vv) = every runtime
/// call. `--debug` opens the session trace channel on top of any level.
pub fn directives(verbosity: u8, session_trace: bool) -> String {
	let base = match verbosity {
		0 => "error",
		1 => "info,scorm_runtime=debug",
		_ => "debug,scorm_runtime=trace",
	};
	if session_trace && verbosity < 2 {
		format!("{base},scorm=debug")
	} else {
		base.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn session_trace_adds_scorm_target() {
		assert_eq!(directives(0, false), "error");
		assert_eq!(directives(0, true), "error,scorm=debug");
		assert_eq!(directives(3, true), "debug,scorm_runtime=trace");
	}
}
