//! Live-search state machine and its status indicator.
//!
//! ```text
//!            activate            pause
//!   None ─────────────► Active ───────► Paused
//!     ▲                  │  ▲  resume    │
//!     │      stop        │  └────────────┘
//!     └──────────────────┴───────────────┘
//!           stop / designated panel closed
//! ```
//!
//! The designation itself lives in [`PanelRegistry`]; this machine is the only
//! writer of it. Every transition is a no-op while nothing is designated.

use quarry_protocol::{LiveSearchAction, PanelId};

use crate::host::{LiveSearchCommand, StatusBar, StatusIndicator, Telemetry};
use crate::registry::PanelRegistry;
use crate::session::{Metadata, PanelEvent};

#[cfg(test)]
mod tests;

const ACTIVE_COMMANDS: [LiveSearchCommand; 2] = [LiveSearchCommand::Pause, LiveSearchCommand::Stop];
const PAUSED_COMMANDS: [LiveSearchCommand; 2] = [LiveSearchCommand::Resume, LiveSearchCommand::Stop];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LiveSearchState {
	#[default]
	None,
	Active,
	Paused,
}

/// Directive the orchestrator must push to the designated panel after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
	pub panel_id: PanelId,
	pub action: LiveSearchAction,
}

#[derive(Default)]
pub struct LiveSearch {
	state: LiveSearchState,
	indicator: Option<Box<dyn StatusIndicator>>,
}

impl std::fmt::Debug for LiveSearch {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LiveSearch")
			.field("state", &self.state)
			.field("indicator", &self.indicator.is_some())
			.finish()
	}
}

impl LiveSearch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> LiveSearchState {
		self.state
	}

	pub fn has_indicator(&self) -> bool {
		self.indicator.is_some()
	}

	/// Designates `panel_id` as the live-search panel and replaces the indicator.
	pub fn activate(&mut self, panel_id: &PanelId, registry: &mut PanelRegistry, status_bar: &dyn StatusBar) {
		tracing::debug!(panel_id = %panel_id, previous = ?self.state, "panels.live_search.activate");
		registry.set_live_search_panel_id(panel_id.clone());
		self.state = LiveSearchState::Active;
		self.dispose_indicator();
		self.indicator = Some(status_bar.show(&ACTIVE_COMMANDS));
	}

	pub fn apply(&mut self, action: LiveSearchAction, registry: &mut PanelRegistry, telemetry: &dyn Telemetry) -> Option<Transition> {
		match action {
			LiveSearchAction::PauseLiveSearch => self.pause(registry, telemetry),
			LiveSearchAction::ResumeLiveSearch => self.resume(registry, telemetry),
			LiveSearchAction::StopLiveSearch => self.stop(registry, telemetry),
		}
	}

	pub fn pause(&mut self, registry: &mut PanelRegistry, telemetry: &dyn Telemetry) -> Option<Transition> {
		self.step(registry, telemetry, LiveSearchState::Active, LiveSearchState::Paused, PanelEvent::Pause)?;
		if let Some(indicator) = self.indicator.as_mut() {
			indicator.set_commands(&PAUSED_COMMANDS);
		}
		self.transition(registry, LiveSearchAction::PauseLiveSearch)
	}

	pub fn resume(&mut self, registry: &mut PanelRegistry, telemetry: &dyn Telemetry) -> Option<Transition> {
		self.step(registry, telemetry, LiveSearchState::Paused, LiveSearchState::Active, PanelEvent::Resume)?;
		if let Some(indicator) = self.indicator.as_mut() {
			indicator.set_commands(&ACTIVE_COMMANDS);
		}
		self.transition(registry, LiveSearchAction::ResumeLiveSearch)
	}

	/// Ends live search from either active or paused, removing the designation.
	pub fn stop(&mut self, registry: &mut PanelRegistry, telemetry: &dyn Telemetry) -> Option<Transition> {
		if self.state == LiveSearchState::None {
			return None;
		}
		let panel_id = registry.live_search_panel_id()?.clone();
		if let Some(panel) = registry.get(&panel_id) {
			panel.session.record(telemetry, PanelEvent::Refine, Metadata::new());
		}
		registry.clear_live_search_panel();
		self.state = LiveSearchState::None;
		self.dispose_indicator();
		Some(Transition {
			panel_id,
			action: LiveSearchAction::StopLiveSearch,
		})
	}

	/// Implicit stop when the user closes a panel. Returns true if it was the
	/// designated one. No directive is produced since the surface is gone.
	pub fn panel_closed(&mut self, panel_id: &PanelId, registry: &mut PanelRegistry) -> bool {
		if !registry.is_live_search_panel(panel_id) {
			return false;
		}
		tracing::debug!(panel_id = %panel_id, "panels.live_search.closed");
		registry.clear_live_search_panel();
		self.state = LiveSearchState::None;
		self.dispose_indicator();
		true
	}

	/// Tears down the indicator without touching the designation.
	pub fn dispose(&mut self) {
		self.state = LiveSearchState::None;
		self.dispose_indicator();
	}

	fn step(&mut self, registry: &mut PanelRegistry, telemetry: &dyn Telemetry, from: LiveSearchState, to: LiveSearchState, event: PanelEvent) -> Option<()> {
		if self.state != from {
			return None;
		}
		let panel_id = registry.live_search_panel_id()?.clone();
		let Some(panel) = registry.get(&panel_id) else {
			// Designation outlived its panel; treat as stopped.
			tracing::debug!(panel_id = %panel_id, "panels.live_search.stale_designation");
			registry.clear_live_search_panel();
			self.dispose();
			return None;
		};
		panel.session.record(telemetry, event, Metadata::new());
		self.state = to;
		Some(())
	}

	fn transition(&self, registry: &PanelRegistry, action: LiveSearchAction) -> Option<Transition> {
		registry.live_search_panel_id().map(|panel_id| Transition {
			panel_id: panel_id.clone(),
			action,
		})
	}

	fn dispose_indicator(&mut self) {
		if let Some(mut indicator) = self.indicator.take() {
			indicator.dispose();
		}
	}
}
