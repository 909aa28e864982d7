//! `scorm probe`: discovery without opening a session.

use std::io::{self, Write};

use scorm::{Locator, SearchRoot, Version};
use serde::Serialize;

use super::load_fixture;
use crate::cli::ProbeArgs;
use crate::error::{CliError, Result};
use crate::output::{self, ErrorCode, OutputFormat, ResultBuilder, TextRender, status_marker};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeData {
	pub found: bool,
	pub version: Option<Version>,
	pub hops: usize,
	/// Search root of the attempt that produced this result.
	pub root: SearchRoot,
}

impl TextRender for ProbeData {
	fn render(&self, out: &mut dyn Write) -> io::Result<()> {
		match self.version {
			Some(version) => writeln!(
				out,
				"{}  SCORM {version} via {:?} after {} hop(s)",
				status_marker(self.found),
				self.root,
				self.hops
			),
			None => writeln!(out, "{}  no runtime API after {} hop(s)", status_marker(false), self.hops),
		}
	}
}

pub fn execute(args: ProbeArgs, format: OutputFormat) -> Result<()> {
	let fixture = load_fixture(&args.session.fixture)?;
	let staged = fixture.build();
	let config = args.session.config();

	let discovery = Locator::new(config.version)
		.with_trace(config.debug)
		.resolve(&staged.content);
	let data = ProbeData {
		found: discovery.is_found(),
		version: discovery.version(),
		hops: discovery.hops,
		root: discovery.root,
	};

	let builder = ResultBuilder::new("probe");
	let builder = if data.found {
		builder
	} else {
		let err = scorm::Error::ApiNotFound {
			version: config.version,
		};
		builder.error_with_details(
			ErrorCode::ApiNotFound,
			err.to_string(),
			serde_json::json!({ "hops": data.hops, "requested": config.version }),
		)
	};
	let found = data.found;
	output::print_result(&builder.data(data).build(), format);

	if !found {
		return Err(CliError::OutputAlreadyPrinted);
	}
	Ok(())
}
