
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use scorm::{SessionConfig, Version};

use crate::commands::run::Step;
use crate::output::OutputFormat;

/// Root CLI for scorm.
#[derive(Parser, Debug)]
#[command(name = "scorm")]
#[command(about = "Drive a SCORM runtime session against an in-memory LMS")]
pub struct Cli {
	/// Increase verbosity (-v info, -vv every runtime call)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: json (default) or text
	#[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Json)]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run a sequence of session steps against a fixture.
	Run(RunArgs),
	/// Run API discovery only and report where the API was found.
	Probe(ProbeArgs),
}

impl Commands {
	/// Whether the session trace channel was requested.
	pub fn trace_enabled(&self) -> bool {
		match self {
			Commands::Run(args) => args.session.debug,
			Commands::Probe(args) => args.session.debug,
		}
	}
}

/// Session options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
	/// Fixture describing the runtime and its placement.
	#[arg(long, value_name = "FILE")]
	pub fixture: PathBuf,

	/// Only accept this SCORM version (1.2 or 2004).
	#[arg(long, value_name = "VERSION")]
	pub version: Option<Version>,

	/// Leave the completion status alone on initialize.
	#[arg(long)]
	pub no_completion_status: bool,

	/// Do not write an exit mode on terminate.
	#[arg(long)]
	pub no_exit_mode: bool,

	/// Emit the session trace channel.
	#[arg(long)]
	pub debug: bool,
}

impl SessionArgs {
	pub fn config(&self) -> SessionConfig {
		let config = SessionConfig::new()
			.with_completion_status(!self.no_completion_status)
			.with_exit_mode(!self.no_exit_mode)
			.with_debug(self.debug);
		match self.version {
			Some(version) => config.with_version(version),
			None => config,
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
	#[command(flatten)]
	pub session: SessionArgs,

	/// Steps to run in order: init, quit, save, get:<field>,
	/// set:<field>=<value>, status, status:<value>, error.
	#[arg(value_name = "STEP", required = true)]
	pub steps: Vec<Step>,
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
	#[command(flatten)]
	pub session: SessionArgs,
}
