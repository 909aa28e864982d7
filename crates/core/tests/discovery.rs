//! Discovery across window hierarchies built with the in-memory runtime.

use proptest::prelude::*;
use scorm::{Locator, MAX_HOPS, SearchRoot, Session, SessionConfig, Version};
use scorm_runtime::{MemoryLms, Window};

fn hierarchy(depth: usize, version: Version) -> (Window, MemoryLms) {
	let top = Window::new("top");
	let lms = MemoryLms::new(version);
	top.install_lms(&lms);
	(top.nest(depth), lms)
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(32))]

	#[test]
	fn locate_finds_api_within_hop_bound(depth in 0..=MAX_HOPS) {
		let (content, _lms) = hierarchy(depth, Version::V2004);
		let found = Locator::new(None).locate(&content);
		prop_assert!(found.is_found());
		prop_assert_eq!(found.hops, depth);
		prop_assert_eq!(found.version(), Some(Version::V2004));
	}

	#[test]
	fn locate_gives_up_beyond_hop_bound(extra in 1usize..64) {
		let (content, _lms) = hierarchy(MAX_HOPS + extra, Version::V1_2);
		let found = Locator::new(None).locate(&content);
		prop_assert!(!found.is_found());
		prop_assert_eq!(found.hops, MAX_HOPS);
	}
}

#[test]
fn test_hop_bound_edges() {
	let (at_bound, _lms) = hierarchy(MAX_HOPS, Version::V1_2);
	assert!(Locator::new(None).locate(&at_bound).is_found());

	let (past_bound, _lms) = hierarchy(MAX_HOPS + 1, Version::V1_2);
	assert!(!Locator::new(None).locate(&past_bound).is_found());
}

#[test]
fn test_resolve_parent_attempt_extends_reach_by_one() {
	let (content, _lms) = hierarchy(MAX_HOPS + 1, Version::V2004);
	let found = Locator::new(None).resolve(&content);
	assert!(found.is_found());
	assert_eq!(found.root, SearchRoot::Parent);

	let (content, _lms) = hierarchy(MAX_HOPS + 2, Version::V2004);
	assert!(!Locator::new(None).resolve(&content).is_found());
}

#[test]
fn test_prefers_2004_when_both_are_present() {
	let top = Window::new("top");
	top.install_lms(&MemoryLms::new(Version::V1_2));
	top.install_lms(&MemoryLms::new(Version::V2004));

	let found = Locator::new(None).locate(&top.nest(2));
	assert_eq!(found.version(), Some(Version::V2004));

	let found = Locator::new(Some(Version::V1_2)).locate(&top.nest(2));
	assert_eq!(found.version(), Some(Version::V1_2));
}

#[test]
fn test_requested_version_missing_is_not_found() {
	let (content, lms) = hierarchy(1, Version::V1_2);
	let mut session = Session::new(content.clone(), SessionConfig::default().with_version(Version::V2004));

	assert!(!Locator::new(Some(Version::V2004)).resolve(&content).is_found());
	assert!(matches!(
		session.initialize(),
		Err(scorm::Error::ApiNotFound {
			version: Some(Version::V2004)
		})
	));
	assert_eq!(session.version(), Some(Version::V2004));
	assert!(lms.calls().is_empty());
}

#[test]
fn test_failed_discovery_does_not_pin_version() {
	let content = Window::new("top").nest(2);
	let mut session = Session::new(content.clone(), SessionConfig::default());

	assert!(session.discover().is_err());
	assert_eq!(session.version(), None);

	let top = scorm::Environment::top(&content).unwrap();
	top.install_lms(&MemoryLms::new(Version::V1_2));
	assert_eq!(session.discover().unwrap().version(), Version::V1_2);
	assert_eq!(session.version(), Some(Version::V1_2));
}

#[test]
fn test_pinned_version_survives_rediscovery() {
	let top = Window::new("top");
	top.install_lms(&MemoryLms::new(Version::V1_2));
	let mut session = Session::new(top.nest(1), SessionConfig::default());

	let first = session.discover().unwrap();
	top.install_lms(&MemoryLms::new(Version::V2004));
	let second = session.discover().unwrap();

	assert_eq!(first.version(), Version::V1_2);
	assert!(first.same_object(&second));
	assert_eq!(session.version(), Some(Version::V1_2));
}

#[test]
fn test_resolve_through_opener() {
	let launcher = Window::new("launcher");
	let lms = MemoryLms::new(Version::V2004);
	launcher.install_lms(&lms);

	let content = launcher.open_popup("player").nest(3);
	let found = Locator::new(None).resolve(&content);
	assert!(found.is_found());
	assert_eq!(found.root, SearchRoot::Opener);
	assert_eq!(found.hops, 0);
}

#[test]
fn test_resolve_through_opener_document() {
	let launcher = Window::new("launcher");
	launcher.attach_document().install_lms(&MemoryLms::new(Version::V1_2));

	let content = launcher.open_popup("player").nest(1);
	let found = Locator::new(None).resolve(&content);
	assert_eq!(found.root, SearchRoot::OpenerDocument);
	assert_eq!(found.version(), Some(Version::V1_2));
}

#[test]
fn test_resolve_without_any_api() {
	let launcher = Window::new("launcher");
	let content = launcher.open_popup("player").nest(2);
	let found = Locator::new(None).with_trace(true).resolve(&content);
	assert!(!found.is_found());
	assert_eq!(found.version(), None);
}
