use scorm_runtime::FixtureError;
use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// Command failed but its envelope has already been printed.
	/// Used to signal exit code 1 without additional output.
	#[error("")]
	OutputAlreadyPrinted,

	#[error(transparent)]
	Session(#[from] scorm::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl CliError {
	pub fn is_output_already_printed(&self) -> bool {
		matches!(self, CliError::OutputAlreadyPrinted)
	}

	pub fn to_command_error(&self) -> CommandError {
		let (code, message) = match self {
			CliError::OutputAlreadyPrinted => (ErrorCode::InternalError, String::new()),
			CliError::Session(err @ scorm::Error::ApiNotFound { .. }) => {
				(ErrorCode::ApiNotFound, err.to_string())
			}
			CliError::Session(err) => (ErrorCode::InternalError, err.to_string()),
			CliError::Json(err) => (ErrorCode::InternalError, err.to_string()),
			CliError::Anyhow(err) => (classify(err), format!("{err:#}")),
		};
		CommandError {
			code,
			message,
			details: None,
		}
	}
}

fn classify(err: &anyhow::Error) -> ErrorCode {
	match err.downcast_ref::<FixtureError>() {
		Some(FixtureError::Io { .. }) => ErrorCode::IoError,
		Some(FixtureError::Json(_)) => ErrorCode::InvalidInput,
		None => ErrorCode::InternalError,
	}
}
