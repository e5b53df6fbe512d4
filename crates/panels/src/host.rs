//! Contracts the orchestrator consumes from its host environment.
//!
//! Every collaborator is a `Send + Sync` trait object so the [`Host`] bundle can
//! move into the control task. Only the history store and autocomplete provider
//! are asynchronous; their calls run on background tasks and report back through
//! the message bus.

use std::sync::Arc;

use async_trait::async_trait;
use quarry_protocol::{
	AutocompleteSuggestion, CodeQuery, CodeSelection, ContentUpdate, HistoryRecord, LiveSearchAction, OutboundDirective, PanelId, Query, QueryContext,
	Severity, Trigger,
};
use serde_json::{Map, Value};

use crate::Result;
use crate::msg::SurfaceEvents;
use crate::session::{Metadata, PanelEvent, TimedEvent};

/// Request handed to the search engine. Results come back through
/// [`crate::OrchestratorHandle::show_results`], never as a return value.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
	pub text: String,
	pub context: QueryContext,
	pub trigger: Trigger,
	pub panel_id: PanelId,
	pub code_query: Option<CodeQuery>,
	pub code_selection: Option<CodeSelection>,
	pub implicit: bool,
}

impl From<&Query> for SearchRequest {
	fn from(query: &Query) -> Self {
		Self {
			text: query.input.clone(),
			context: query.query_context.clone(),
			trigger: query.trigger,
			panel_id: query.id.clone(),
			code_query: query.code_query.clone(),
			code_selection: query.code_selection.clone(),
			implicit: query.implicit,
		}
	}
}

/// Query/search execution engine.
pub trait SearchEngine: Send + Sync {
	fn search_text(&self, request: SearchRequest);
}

/// Parameters for a new display surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceInit {
	pub panel_id: PanelId,
	pub title: String,
	/// Loading view to render before any push arrives.
	pub initial: ContentUpdate,
}

/// One renderable surface, exclusively owned by its panel.
pub trait DisplaySurface: Send {
	fn set_title(&mut self, title: &str);
	/// Brings the surface to the foreground.
	fn reveal(&mut self);
	fn post(&mut self, directive: &OutboundDirective) -> Result<()>;
	fn dispose(&mut self);
}

/// Creates display surfaces.
///
/// The factory receives the surface's [`SurfaceEvents`] port and must route every
/// surface message and the close notification through it.
pub trait SurfaceFactory: Send + Sync {
	fn create(&self, init: SurfaceInit, events: SurfaceEvents) -> Result<Box<dyn DisplaySurface>>;
}

/// Command offered by the live-search status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiveSearchCommand {
	Pause,
	Resume,
	Stop,
}

impl LiveSearchCommand {
	pub const fn action(self) -> LiveSearchAction {
		match self {
			Self::Pause => LiveSearchAction::PauseLiveSearch,
			Self::Resume => LiveSearchAction::ResumeLiveSearch,
			Self::Stop => LiveSearchAction::StopLiveSearch,
		}
	}

	pub const fn label(self) -> &'static str {
		match self {
			Self::Pause => "Pause",
			Self::Resume => "Resume",
			Self::Stop => "Stop",
		}
	}
}

/// Persistent live-search indicator.
pub trait StatusIndicator: Send {
	fn set_commands(&mut self, commands: &[LiveSearchCommand]);
	fn dispose(&mut self);
}

pub trait StatusBar: Send + Sync {
	fn show(&self, commands: &[LiveSearchCommand]) -> Box<dyn StatusIndicator>;
}

/// Filter criteria for listing stored searches.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryQuery {
	pub panel_id: PanelId,
	pub filters: Map<String, Value>,
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
	async fn add_record(&self, record: HistoryRecord) -> Result<()>;
	async fn search_history(&self, query: HistoryQuery) -> Result<Vec<HistoryRecord>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteRequest {
	pub panel_id: PanelId,
	pub input: String,
	/// Context sets of the query the panel currently shows.
	pub query_context: QueryContext,
}

#[async_trait]
pub trait AutocompleteProvider: Send + Sync {
	async fn get_autocomplete(&self, request: AutocompleteRequest) -> Result<Vec<AutocompleteSuggestion>>;
}

/// Host notification display.
pub trait Notifier: Send + Sync {
	fn notify(&self, severity: Severity, message: &str, details: Option<&str>);
}

pub trait Telemetry: Send + Sync {
	/// Records an event scoped to a panel session.
	fn record(&self, event: TimedEvent);
	/// Emits the same logical event process-wide.
	fn emit(&self, event: PanelEvent, metadata: &Metadata);
}

/// Opens links in the host's default external handler.
pub trait ExternalOpener: Send + Sync {
	fn open_external(&self, url: &str) -> Result<()>;
}

/// Collaborator bundle owned by the orchestrator.
#[derive(Clone)]
pub struct Host {
	pub engine: Arc<dyn SearchEngine>,
	pub surfaces: Arc<dyn SurfaceFactory>,
	pub status_bar: Arc<dyn StatusBar>,
	pub history: Arc<dyn HistoryStore>,
	pub autocomplete: Arc<dyn AutocompleteProvider>,
	pub notifier: Arc<dyn Notifier>,
	pub telemetry: Arc<dyn Telemetry>,
	pub opener: Arc<dyn ExternalOpener>,
}
