use quarry_protocol::{Query, Trigger};

use super::*;
use crate::registry::PanelHandle;
use crate::session::SessionClock;
use crate::testing::{FakeStatusBar, FakeTelemetry, SurfaceLog, panel};

struct Fixture {
	registry: PanelRegistry,
	live: LiveSearch,
	status_bar: FakeStatusBar,
	telemetry: FakeTelemetry,
}

impl Fixture {
	fn new() -> Self {
		let mut clock = SessionClock::new();
		let mut registry = PanelRegistry::new();
		for id in ["live", "other"] {
			let id = panel(id);
			let session = clock.mint(&id);
			registry.save(id.clone(), PanelHandle::new(SurfaceLog::default().boxed_surface(), session, Query::implicit(id, "q")));
		}
		Self {
			registry,
			live: LiveSearch::new(),
			status_bar: FakeStatusBar::default(),
			telemetry: FakeTelemetry::default(),
		}
	}

	fn activate(&mut self) {
		self.live.activate(&panel("live"), &mut self.registry, &self.status_bar);
	}

	fn pause(&mut self) -> Option<Transition> {
		self.live.pause(&mut self.registry, &self.telemetry)
	}

	fn resume(&mut self) -> Option<Transition> {
		self.live.resume(&mut self.registry, &self.telemetry)
	}

	fn stop(&mut self) -> Option<Transition> {
		self.live.stop(&mut self.registry, &self.telemetry)
	}
}

#[tokio::test]
async fn transitions_are_noops_without_designation() {
	let mut fx = Fixture::new();
	assert_eq!(fx.pause(), None);
	assert_eq!(fx.resume(), None);
	assert_eq!(fx.stop(), None);
	assert!(fx.telemetry.recorded().is_empty());
	assert_eq!(fx.live.state(), LiveSearchState::None);
}

#[tokio::test]
async fn activate_designates_and_shows_indicator() {
	let mut fx = Fixture::new();
	fx.activate();

	assert_eq!(fx.live.state(), LiveSearchState::Active);
	assert_eq!(fx.registry.live_search_panel_id(), Some(&panel("live")));
	assert_eq!(fx.status_bar.current_commands(), Some(vec![LiveSearchCommand::Pause, LiveSearchCommand::Stop]));

	// Re-activation replaces the indicator instead of stacking a second one.
	fx.activate();
	assert_eq!(fx.status_bar.shown(), 2);
	assert_eq!(fx.status_bar.live(), 1);
}

#[tokio::test]
async fn pause_then_resume_round_trip() {
	let mut fx = Fixture::new();
	fx.activate();

	let paused = fx.pause().unwrap();
	assert_eq!(paused.panel_id, panel("live"));
	assert_eq!(paused.action, LiveSearchAction::PauseLiveSearch);
	assert_eq!(fx.live.state(), LiveSearchState::Paused);
	assert_eq!(fx.status_bar.current_commands(), Some(vec![LiveSearchCommand::Resume, LiveSearchCommand::Stop]));

	let resumed = fx.resume().unwrap();
	assert_eq!(resumed.action, LiveSearchAction::ResumeLiveSearch);
	assert_eq!(fx.live.state(), LiveSearchState::Active);
	assert_eq!(fx.status_bar.current_commands(), Some(vec![LiveSearchCommand::Pause, LiveSearchCommand::Stop]));

	assert_eq!(fx.telemetry.count(PanelEvent::Pause), 1);
	assert_eq!(fx.telemetry.count(PanelEvent::Resume), 1);
	assert!(fx.telemetry.recorded().iter().all(|event| event.panel_id == panel("live")));
}

#[tokio::test]
async fn repeated_pause_and_resume_are_noops() {
	let mut fx = Fixture::new();
	fx.activate();

	assert_eq!(fx.resume(), None, "resume while active");
	assert!(fx.pause().is_some());
	assert_eq!(fx.pause(), None, "pause while paused");

	assert_eq!(fx.telemetry.count(PanelEvent::Pause), 1);
	assert_eq!(fx.telemetry.count(PanelEvent::Resume), 0);
}

#[tokio::test]
async fn stop_clears_designation_from_either_state() {
	for pause_first in [false, true] {
		let mut fx = Fixture::new();
		fx.activate();
		if pause_first {
			fx.pause();
		}

		let stopped = fx.stop().unwrap();
		assert_eq!(stopped.action, LiveSearchAction::StopLiveSearch);
		assert_eq!(fx.registry.live_search_panel_id(), None);
		assert_eq!(fx.live.state(), LiveSearchState::None);
		assert!(!fx.live.has_indicator());
		assert_eq!(fx.status_bar.live(), 0);
		assert_eq!(fx.telemetry.count(PanelEvent::Refine), 1);

		assert_eq!(fx.stop(), None);
		assert_eq!(fx.telemetry.count(PanelEvent::Refine), 1);
	}
}

#[tokio::test]
async fn closing_designated_panel_stops_once() {
	let mut fx = Fixture::new();
	fx.activate();

	assert!(!fx.live.panel_closed(&panel("other"), &mut fx.registry));
	assert_eq!(fx.live.state(), LiveSearchState::Active);

	assert!(fx.live.panel_closed(&panel("live"), &mut fx.registry));
	assert!(!fx.live.panel_closed(&panel("live"), &mut fx.registry));

	assert_eq!(fx.registry.live_search_panel_id(), None);
	assert_eq!(fx.status_bar.disposals(), 1);
	assert!(fx.telemetry.recorded().is_empty(), "implicit stop records nothing");
}

#[tokio::test]
async fn stale_designation_is_dropped() {
	let mut fx = Fixture::new();
	fx.activate();
	fx.registry.delete(&panel("live"));

	assert_eq!(fx.pause(), None);
	assert_eq!(fx.registry.live_search_panel_id(), None);
	assert_eq!(fx.status_bar.live(), 0);
}

#[test]
fn trigger_of_implicit_query_is_live_search() {
	assert_eq!(Query::implicit("p", "x").trigger, Trigger::LiveSearch);
}
