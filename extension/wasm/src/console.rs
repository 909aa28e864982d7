//! Routes the session trace channel to the browser console.

use std::io;

use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

/// Buffers one formatted event and logs it when dropped.
#[derive(Default)]
pub struct ConsoleWriter {
	buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.buffer.extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl Drop for ConsoleWriter {
	fn drop(&mut self) {
		if self.buffer.is_empty() {
			return;
		}
		let line = String::from_utf8_lossy(&self.buffer);
		web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
	}
}

#[derive(Clone, Copy, Default)]
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
	type Writer = ConsoleWriter;

	fn make_writer(&'a self) -> Self::Writer {
		ConsoleWriter::default()
	}
}

/// Installs a console subscriber for debug-level events. Later calls are
/// no-ops.
pub fn install() {
	let _ = tracing_subscriber::fmt()
		.with_writer(MakeConsoleWriter)
		.with_max_level(tracing::Level::DEBUG)
		.without_time()
		.with_target(false)
		.try_init();
}
