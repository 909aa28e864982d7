//! Tree of execution contexts that can carry runtime API objects.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use scorm_protocol::{ApiObject, Environment, Version};

use crate::lms::MemoryLms;

struct WindowNode {
	name: String,
	parent: Option<Window>,
	opener: RefCell<Option<Window>>,
	document: RefCell<Option<Window>>,
	apis: RefCell<HashMap<Version, Rc<dyn ApiObject>>>,
}

/// Handle to one context in a window hierarchy.
///
/// Frames hold their parent and popups hold their opener, so a hierarchy
/// stays alive for as long as the innermost handle a caller holds. A root's
/// [`parent`](Environment::parent) is the root itself, the way a browser's
/// top window behaves.
#[derive(Clone)]
pub struct Window(Rc<WindowNode>);

impl Window {
	/// Creates a new top-level window.
	pub fn new(name: impl Into<String>) -> Self {
		Self::with_parent(name.into(), None)
	}

	fn with_parent(name: String, parent: Option<Window>) -> Self {
		Window(Rc::new(WindowNode {
			name,
			parent,
			opener: RefCell::new(None),
			document: RefCell::new(None),
			apis: RefCell::new(HashMap::new()),
		}))
	}

	pub fn name(&self) -> &str {
		&self.0.name
	}

	/// Adds a frame below this window and returns it.
	pub fn child(&self, name: impl Into<String>) -> Window {
		Self::with_parent(name.into(), Some(self.clone()))
	}

	/// Nests `depth` frames below this window and returns the innermost one.
	///
	/// A depth of zero returns this window.
	pub fn nest(&self, depth: usize) -> Window {
		(1..=depth).fold(self.clone(), |frame, level| frame.child(format!("{}/frame{level}", self.name())))
	}

	/// Opens a new top-level window whose opener is this one.
	pub fn open_popup(&self, name: impl Into<String>) -> Window {
		let popup = Window::new(name);
		popup.set_opener(self);
		popup
	}

	/// Records `opener` as the window that opened this one.
	pub fn set_opener(&self, opener: &Window) {
		*self.0.opener.borrow_mut() = Some(opener.clone());
	}

	/// Attaches a separate document context to this window and returns it.
	pub fn attach_document(&self) -> Window {
		let document = Window::new(format!("{}#document", self.name()));
		*self.0.document.borrow_mut() = Some(document.clone());
		document
	}

	/// Exposes `api` on this window under `version`'s property name.
	pub fn install(&self, version: Version, api: Rc<dyn ApiObject>) {
		self.0.apis.borrow_mut().insert(version, api);
	}

	/// Exposes an in-memory runtime under its own version.
	pub fn install_lms(&self, lms: &MemoryLms) {
		self.install(lms.version(), lms.as_api());
	}

	/// Removes whatever this window exposes under `version`.
	pub fn uninstall(&self, version: Version) {
		self.0.apis.borrow_mut().remove(&version);
	}
}

impl Environment for Window {
	fn api(&self, version: Version) -> Option<Rc<dyn ApiObject>> {
		self.0.apis.borrow().get(&version).cloned()
	}

	fn parent(&self) -> Option<Self> {
		Some(self.0.parent.clone().unwrap_or_else(|| self.clone()))
	}

	fn top(&self) -> Option<Self> {
		let mut current = self.clone();
		while let Some(parent) = current.0.parent.clone() {
			current = parent;
		}
		Some(current)
	}

	fn opener(&self) -> Option<Self> {
		self.0.opener.borrow().clone()
	}

	fn document(&self) -> Option<Self> {
		self.0.document.borrow().clone()
	}

	fn is_same(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for Window {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut versions: Vec<_> = self.0.apis.borrow().keys().map(|v| v.as_str()).collect();
		versions.sort_unstable();
		f.debug_struct("Window")
			.field("name", &self.0.name)
			.field("apis", &versions)
			.finish()
	}
}
