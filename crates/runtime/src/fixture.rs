//! JSON description of a runtime and where it sits relative to the content.
//!
//! ```json
//! {
//!   "lms": { "version": "2004", "values": { "cmi.location": "p3" } },
//!   "placement": { "frameDepth": 2, "location": "ancestor" }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use scorm_protocol::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::lms::{Faults, MemoryLms};
use crate::window::Window;

#[derive(Debug, Error)]
pub enum FixtureError {
	#[error("failed to read fixture {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid fixture: {0}")]
	Json(#[from] serde_json::Error),
}

/// Context that exposes the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
	/// The content context itself.
	#[serde(rename = "self")]
	Current,
	/// The top-most window above the content frames.
	#[default]
	Ancestor,
	/// The window that opened the content's top window.
	Opener,
	/// The document context of that opener.
	OpenerDocument,
	/// Nowhere; discovery is expected to fail.
	None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Placement {
	/// Frames between the content and its top window.
	pub frame_depth: usize,
	pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LmsFixture {
	pub version: Version,
	/// Seed the status element with its fresh-attempt value.
	#[serde(default = "default_true")]
	pub seed_defaults: bool,
	#[serde(default)]
	pub values: BTreeMap<String, String>,
	#[serde(default)]
	pub faults: Faults,
}

fn default_true() -> bool {
	true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
	pub lms: LmsFixture,
	#[serde(default)]
	pub placement: Placement,
}

/// A built fixture: the context content code runs in, and the runtime.
#[derive(Debug, Clone)]
pub struct Staged {
	pub content: Window,
	pub lms: MemoryLms,
}

impl Fixture {
	pub fn new(version: Version) -> Self {
		Self {
			lms: LmsFixture {
				version,
				seed_defaults: true,
				values: BTreeMap::new(),
				faults: Faults::default(),
			},
			placement: Placement::default(),
		}
	}

	pub fn load(path: &Path) -> Result<Self, FixtureError> {
		let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_json(&content)
	}

	pub fn from_json(json: &str) -> Result<Self, FixtureError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Builds the window hierarchy and installs the runtime in it.
	pub fn build(&self) -> Staged {
		let lms = if self.lms.seed_defaults {
			MemoryLms::new(self.lms.version)
		} else {
			MemoryLms::empty(self.lms.version)
		};
		let lms = self
			.lms
			.values
			.iter()
			.fold(lms, |lms, (field, value)| lms.with_value(field, value))
			.with_faults(self.lms.faults.clone());

		let top = Window::new("top");
		let content = top.nest(self.placement.frame_depth);
		match self.placement.location {
			Location::Current => content.install_lms(&lms),
			Location::Ancestor => top.install_lms(&lms),
			Location::Opener => {
				let launcher = Window::new("launcher");
				launcher.install_lms(&lms);
				top.set_opener(&launcher);
			}
			Location::OpenerDocument => {
				let launcher = Window::new("launcher");
				launcher.attach_document().install_lms(&lms);
				top.set_opener(&launcher);
			}
			Location::None => {}
		}

		debug!(
			target: "scorm_runtime",
			version = %self.lms.version,
			depth = self.placement.frame_depth,
			location = ?self.placement.location,
			"fixture staged"
		);
		Staged { content, lms }
	}
}
