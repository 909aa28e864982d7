//! Debug-gated trace channel.
//!
//! Every line goes through `tracing` under the `scorm` target at debug level,
//! but only when the session's `debug` toggle is on. Which subscriber prints
//! it is up to the host.

/// Emits a trace line when `$enabled` is true.
macro_rules! trace_if {
	($enabled:expr, $($arg:tt)+) => {
		if $enabled {
			::tracing::debug!(target: "scorm", $($arg)+);
		}
	};
}

pub(crate) use trace_if;
