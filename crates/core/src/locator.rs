//! Runtime API discovery across nested execution contexts.
//!
//! Content may run in a frame, a popup, or a window opened by a launcher, and
//! the LMS can expose its API object at any of those levels. Discovery walks
//! up the parent chain from a starting context, and [`Locator::resolve`]
//! retries from a fixed list of alternative roots.

use scorm_protocol::{Environment, Version};
use serde::Serialize;

use crate::handle::RuntimeApi;
use crate::trace::trace_if;

/// Maximum number of parent hops taken from a single search root.
pub const MAX_HOPS: usize = 500;

/// Where a search attempt started, relative to the resolve root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchRoot {
	Current,
	Parent,
	Opener,
	OpenerDocument,
}

/// Outcome of one discovery attempt.
#[derive(Debug, Clone)]
pub struct Discovery {
	/// Handle found, tagged with its version.
	pub handle: Option<RuntimeApi>,
	/// Parent hops taken by the attempt that produced this result.
	pub hops: usize,
	/// Root of that attempt.
	pub root: SearchRoot,
}

impl Discovery {
	pub fn is_found(&self) -> bool {
		self.handle.is_some()
	}

	pub fn version(&self) -> Option<Version> {
		self.handle.as_ref().map(RuntimeApi::version)
	}

	pub fn into_handle(self) -> Option<RuntimeApi> {
		self.handle
	}
}

/// Bounded multi-strategy API search.
///
/// The locator is pure: it reports the version it found on the returned
/// handle and leaves pinning it to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Locator {
	requested: Option<Version>,
	trace: bool,
}

impl Locator {
	/// Creates a locator. With `requested` set, only that version is accepted.
	pub fn new(requested: Option<Version>) -> Self {
		Self {
			requested,
			trace: false,
		}
	}

	pub fn with_trace(mut self, enabled: bool) -> Self {
		self.trace = enabled;
		self
	}

	/// Walks up from `env` and picks an API object at the first context that
	/// has one.
	pub fn locate<E: Environment>(&self, env: &E) -> Discovery {
		self.locate_from(env, SearchRoot::Current)
	}

	fn locate_from<E: Environment>(&self, env: &E, root: SearchRoot) -> Discovery {
		let mut current = env.clone();
		let mut hops = 0;

		while !current.has_any_api() && hops < MAX_HOPS {
			match current.parent() {
				Some(parent) if !parent.is_same(&current) => {
					current = parent;
					hops += 1;
				}
				_ => break,
			}
		}

		let handle = match self.requested {
			Some(version) => {
				let found = current.api(version).map(|object| RuntimeApi::new(version, object));
				if found.is_none() {
					trace_if!(
						self.trace,
						"API.find: SCORM version {} was requested, but {} cannot be found",
						version,
						version.property()
					);
				}
				found
			}
			None => Version::PREFERENCE.iter().find_map(|version| {
				current
					.api(*version)
					.map(|object| RuntimeApi::new(*version, object))
			}),
		};

		match &handle {
			Some(api) => trace_if!(
				self.trace,
				"API.find: API found. Version: {}, hops: {}, api: {:?}",
				api.version(),
				hops,
				api
			),
			None => trace_if!(
				self.trace,
				"API.find: error finding API. Find attempts: {}. Find attempt limit: {}",
				hops,
				MAX_HOPS
			),
		}

		Discovery { handle, hops, root }
	}

	/// Tries `root`, its parent, the top context's opener and that opener's
	/// document, returning the first successful discovery.
	pub fn resolve<E: Environment>(&self, root: &E) -> Discovery {
		let mut last = self.locate_from(root, SearchRoot::Current);
		if last.is_found() {
			return last;
		}

		if let Some(parent) = root.parent().filter(|p| !p.is_same(root)) {
			last = self.locate_from(&parent, SearchRoot::Parent);
			if last.is_found() {
				return last;
			}
		}

		let top = root.top().unwrap_or_else(|| root.clone());
		if let Some(opener) = top.opener() {
			last = self.locate_from(&opener, SearchRoot::Opener);
			if last.is_found() {
				return last;
			}

			if let Some(document) = opener.document() {
				last = self.locate_from(&document, SearchRoot::OpenerDocument);
				if last.is_found() {
					return last;
				}
			}
		}

		trace_if!(self.trace, "API.get failed: can't find the API");
		last
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use scorm_protocol::{ApiObject, InvokeError, RuntimeValue};

	use super::*;

	struct NullApi;

	impl ApiObject for NullApi {
		fn invoke(&self, _method: &str, _args: &[&str]) -> Result<RuntimeValue, InvokeError> {
			Ok(RuntimeValue::Undefined)
		}
	}

	#[derive(Default)]
	struct Node {
		v1: Option<Rc<dyn ApiObject>>,
		v2004: Option<Rc<dyn ApiObject>>,
		parent: RefCell<Option<Ctx>>,
	}

	#[derive(Clone)]
	struct Ctx(Rc<Node>);

	impl Environment for Ctx {
		fn api(&self, version: Version) -> Option<Rc<dyn ApiObject>> {
			match version {
				Version::V1_2 => self.0.v1.clone(),
				Version::V2004 => self.0.v2004.clone(),
			}
		}

		fn parent(&self) -> Option<Self> {
			self.0.parent.borrow().clone()
		}

		fn opener(&self) -> Option<Self> {
			None
		}

		fn document(&self) -> Option<Self> {
			None
		}

		fn is_same(&self, other: &Self) -> bool {
			Rc::ptr_eq(&self.0, &other.0)
		}
	}

	fn node(v1: bool, v2004: bool) -> Ctx {
		Ctx(Rc::new(Node {
			v1: v1.then(|| Rc::new(NullApi) as Rc<dyn ApiObject>),
			v2004: v2004.then(|| Rc::new(NullApi) as Rc<dyn ApiObject>),
			parent: RefCell::new(None),
		}))
	}

	fn child_of(parent: &Ctx) -> Ctx {
		let child = node(false, false);
		*child.0.parent.borrow_mut() = Some(parent.clone());
		child
	}

	#[test]
	fn test_prefers_2004_when_both_present() {
		let ctx = node(true, true);
		let found = Locator::new(None).locate(&ctx);
		assert_eq!(found.version(), Some(Version::V2004));
		assert_eq!(found.hops, 0);
	}

	#[test]
	fn test_requested_version_rejects_other_version() {
		let ctx = node(false, true);
		let found = Locator::new(Some(Version::V1_2)).locate(&ctx);
		assert!(!found.is_found());
	}

	#[test]
	fn test_walk_stops_at_first_context_with_any_api() {
		// Grandparent has 1.2, parent has 2004; asking for 1.2 stops at the parent.
		let grandparent = node(true, false);
		let parent = node(false, true);
		*parent.0.parent.borrow_mut() = Some(grandparent);
		let child = child_of(&parent);

		let found = Locator::new(Some(Version::V1_2)).locate(&child);
		assert!(!found.is_found());
		assert_eq!(found.hops, 1);
	}

	#[test]
	fn test_self_parent_is_fixed_point() {
		let root = node(false, false);
		*root.0.parent.borrow_mut() = Some(root.clone());
		let found = Locator::new(None).locate(&root);
		assert!(!found.is_found());
		assert_eq!(found.hops, 0);
		// Break the cycle so the test does not leak.
		root.0.parent.borrow_mut().take();
	}

	#[test]
	fn test_resolve_walks_up_from_current_root() {
		let parent = node(false, true);
		let child = child_of(&parent);
		let found = Locator::new(None).resolve(&child);
		assert!(found.is_found());
		assert_eq!(found.root, SearchRoot::Current);
		assert_eq!(found.hops, 1);
	}

	#[test]
	fn test_resolve_falls_back_to_parent_root() {
		// The child's 1.2 object ends the first walk without a 2004 match.
		let parent = node(false, true);
		let child = node(true, false);
		*child.0.parent.borrow_mut() = Some(parent.clone());

		let found = Locator::new(Some(Version::V2004)).resolve(&child);
		assert!(found.is_found());
		assert_eq!(found.root, SearchRoot::Parent);
		assert_eq!(found.hops, 0);
		assert_eq!(found.version(), Some(Version::V2004));
	}
}
