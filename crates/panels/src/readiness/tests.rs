use quarry_protocol::{ContentUpdate, LiveSearchAction, Query, Trigger};

use super::*;

fn content(text: &str) -> OutboundDirective {
	OutboundDirective::Content(ContentUpdate::results(&Query::new("p", text, Trigger::SearchBarInput), Vec::new()))
}

#[test]
fn pending_panel_parks_until_ready() {
	let id = PanelId::new("p");
	let mut tracker = ReadinessTracker::new();
	tracker.track(id.clone());

	assert!(!tracker.is_ready(&id));
	assert_eq!(tracker.admit(&id, content("one")), Admission::Parked);
	assert_eq!(tracker.admit(&id, OutboundDirective::live_search(LiveSearchAction::PauseLiveSearch)), Admission::Parked);
	assert_eq!(tracker.parked(&id), 2);

	let flushed = tracker.mark_ready(&id).unwrap();
	assert_eq!(flushed, vec![content("one"), OutboundDirective::live_search(LiveSearchAction::PauseLiveSearch)]);
	assert!(tracker.is_ready(&id));
	assert_eq!(tracker.parked(&id), 0);
}

#[test]
fn readiness_is_one_way_and_flushes_once() {
	let id = PanelId::new("p");
	let mut tracker = ReadinessTracker::new();
	tracker.track(id.clone());
	tracker.admit(&id, content("one"));

	assert_eq!(tracker.mark_ready(&id).map(|v| v.len()), Some(1));
	assert_eq!(tracker.mark_ready(&id), Some(Vec::new()));

	// Re-tracking an existing panel must not reset it to pending.
	tracker.track(id.clone());
	assert!(tracker.is_ready(&id));
	assert_eq!(tracker.admit(&id, content("two")), Admission::Deliver(content("two")));
}

#[test]
fn untracked_panels_discard_pushes() {
	let id = PanelId::new("gone");
	let mut tracker = ReadinessTracker::new();
	assert_eq!(tracker.admit(&id, content("x")), Admission::Untracked);
	assert_eq!(tracker.mark_ready(&id), None);
	assert!(!tracker.is_tracked(&id));
}

#[test]
fn forget_drops_parked_pushes() {
	let id = PanelId::new("p");
	let mut tracker = ReadinessTracker::new();
	tracker.track(id.clone());
	tracker.admit(&id, content("x"));
	tracker.forget(&id);

	assert!(!tracker.is_tracked(&id));
	assert_eq!(tracker.parked(&id), 0);
	assert_eq!(tracker.admit(&id, content("y")), Admission::Untracked);
}
