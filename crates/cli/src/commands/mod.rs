pub mod probe;
pub mod run;

use std::path::Path;

use anyhow::Context;
use scorm_runtime::Fixture;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use crate::output::OutputFormat;

pub fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	match cli.command {
		Commands::Run(args) => run::execute(args, format),
		Commands::Probe(args) => probe::execute(args, format),
	}
}

pub(crate) fn load_fixture(path: &Path) -> anyhow::Result<Fixture> {
	Fixture::load(path).with_context(|| format!("loading fixture {}", path.display()))
}
