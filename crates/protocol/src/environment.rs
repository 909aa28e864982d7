//! Execution context hierarchy seen by the API locator.

use std::rc::Rc;

use crate::api::ApiObject;
use crate::version::Version;

/// One node in a tree of nested execution contexts (window, frame, popup).
///
/// Environments are owned by the host. The locator only follows references
/// and reads the API properties; it never creates or mutates contexts.
pub trait Environment: Clone {
	/// API object this context exposes for `version`, if any.
	fn api(&self, version: Version) -> Option<Rc<dyn ApiObject>>;

	/// Parent context. At the root this may return the context itself.
	fn parent(&self) -> Option<Self>;

	/// Top-most context of this hierarchy, when distinct from `self`.
	fn top(&self) -> Option<Self> {
		None
	}

	/// Context that opened this one (popup launchers).
	fn opener(&self) -> Option<Self>;

	/// Embedded document context, when the host models it separately.
	fn document(&self) -> Option<Self>;

	/// Identity check; host handles are not comparable by address.
	fn is_same(&self, other: &Self) -> bool;

	/// True when either version's API object is present.
	fn has_any_api(&self) -> bool {
		Version::PREFERENCE.iter().any(|v| self.api(*v).is_some())
	}
}
