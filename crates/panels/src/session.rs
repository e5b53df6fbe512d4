//! Telemetry correlation scoped to the query currently shown in a panel.

use std::time::Duration;

use quarry_protocol::PanelId;
use serde_json::{Map, Value};
use tokio::time::Instant;

use crate::host::Telemetry;

/// Free-form event metadata.
pub type Metadata = Map<String, Value>;

/// Monotonic session identifier, unique per orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Named telemetry events emitted by panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelEvent {
	Search,
	ResultsShown,
	Upvote,
	Downvote,
	Stars,
	Feedback,
	Click,
	Copy,
	OpenSuggestion,
	SelectSuggestionText,
	HoverSuggestion,
	SelectAutocompleteSuggestion,
	ClickCodeDetails,
	AddQueryContext,
	RemoveQueryContext,
	/// Live search paused.
	Pause,
	/// Live search resumed.
	Resume,
	/// Live search stopped so the user can refine the query by hand.
	Refine,
}

impl PanelEvent {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Search => "search",
			Self::ResultsShown => "resultsShown",
			Self::Upvote => "upvote",
			Self::Downvote => "downvote",
			Self::Stars => "stars",
			Self::Feedback => "feedback",
			Self::Click => "click",
			Self::Copy => "copy",
			Self::OpenSuggestion => "openSuggestion",
			Self::SelectSuggestionText => "selectSuggestionText",
			Self::HoverSuggestion => "hoverSuggestion",
			Self::SelectAutocompleteSuggestion => "selectAutocompleteSuggestion",
			Self::ClickCodeDetails => "clickCodeDetails",
			Self::AddQueryContext => "addQueryContext",
			Self::RemoveQueryContext => "removeQueryContext",
			Self::Pause => "pause",
			Self::Resume => "resume",
			Self::Refine => "refine",
		}
	}
}

/// One event recorded against a session.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
	pub session: SessionId,
	pub panel_id: PanelId,
	pub event: PanelEvent,
	/// Time since the session was minted.
	pub elapsed: Duration,
	pub metadata: Metadata,
}

/// Correlation handle for the query a panel currently shows.
///
/// Replaced, never mutated, when a new query is issued inside the panel.
#[derive(Debug, Clone)]
pub struct Session {
	id: SessionId,
	panel_id: PanelId,
	started: Instant,
}

impl Session {
	pub fn id(&self) -> SessionId {
		self.id
	}

	pub fn panel_id(&self) -> &PanelId {
		&self.panel_id
	}

	pub fn elapsed(&self) -> Duration {
		self.started.elapsed()
	}

	/// Records `event` on this session and emits it process-wide.
	pub fn record(&self, telemetry: &dyn Telemetry, event: PanelEvent, metadata: Metadata) {
		tracing::trace!(session = self.id.0, panel_id = %self.panel_id, event = event.as_str(), "panels.telemetry");
		telemetry.emit(event, &metadata);
		telemetry.record(TimedEvent {
			session: self.id,
			panel_id: self.panel_id.clone(),
			event,
			elapsed: self.elapsed(),
			metadata,
		});
	}
}

/// Mints sessions with monotonically increasing ids.
#[derive(Debug, Default)]
pub struct SessionClock {
	last: u64,
}

impl SessionClock {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn mint(&mut self, panel_id: &PanelId) -> Session {
		self.last = self.last.wrapping_add(1);
		Session {
			id: SessionId(self.last),
			panel_id: panel_id.clone(),
			started: Instant::now(),
		}
	}
}
