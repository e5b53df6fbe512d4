//! Message bus feeding the control task.
//!
//! ```text
//! engine ──show_results──┐
//! surface ──SurfaceEvents─┼──► PanelMsg ──► PanelOrchestrator::apply
//! result task ────────────┤
//! collaborator task ──────┘
//! ```
//!
//! Spawned tasks only ever post here; orchestrator state is touched by the
//! control task alone.

use std::future::Future;
use std::pin::Pin;

use quarry_protocol::{AutocompleteSuggestion, HistoryRecord, InboundMessage, LiveSearchAction, PanelId, Query, SuggestionItem};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::registry::PanelGeneration;
use crate::session::Session;
use crate::{Error, Result};

/// Future resolving to the ordered suggestions of one query.
pub type ResultFuture = Pin<Box<dyn Future<Output = Result<Vec<SuggestionItem>>> + Send>>;

/// A query plus the future of its results, as handed over by the search engine.
pub struct SearchOutput {
	pub query: Query,
	pub results: ResultFuture,
}

impl SearchOutput {
	pub fn new<F>(query: Query, results: F) -> Self
	where
		F: Future<Output = Result<Vec<SuggestionItem>>> + Send + 'static,
	{
		Self {
			query,
			results: Box::pin(results),
		}
	}

	/// Output whose results are already known.
	pub fn ready(query: Query, suggestions: Vec<SuggestionItem>) -> Self {
		Self::new(query, std::future::ready(Ok(suggestions)))
	}
}

impl std::fmt::Debug for SearchOutput {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SearchOutput").field("query", &self.query).finish_non_exhaustive()
	}
}

/// A result future that finished, posted back by its awaiting task.
#[derive(Debug)]
pub struct ResultsSettled {
	pub panel_id: PanelId,
	/// Opening of the panel the query was shown in.
	pub generation: PanelGeneration,
	/// Session of the query, which may since have been replaced on the panel.
	pub session: Session,
	pub query: Query,
	/// When `show_results` was entered.
	pub started: Instant,
	pub outcome: Result<Vec<SuggestionItem>>,
}

/// Top-level message applied by the control task.
#[derive(Debug)]
pub enum PanelMsg {
	ShowResults(SearchOutput),
	Surface { panel_id: PanelId, message: InboundMessage },
	SurfaceClosed(PanelId),
	ResultsSettled(ResultsSettled),
	HistoryListed { panel_id: PanelId, records: Vec<HistoryRecord> },
	AutocompleteResolved { panel_id: PanelId, input: String, suggestions: Vec<AutocompleteSuggestion> },
	/// Status indicator command invoked by the host.
	LiveSearch(LiveSearchAction),
	RevealMostRecent,
	/// Replies once every earlier message has been applied.
	Flush(oneshot::Sender<()>),
	Shutdown,
}

pub type MsgSender = mpsc::UnboundedSender<PanelMsg>;

pub type MsgReceiver = mpsc::UnboundedReceiver<PanelMsg>;

pub fn channel() -> (MsgSender, MsgReceiver) {
	mpsc::unbounded_channel()
}

/// Per-surface event port handed to [`crate::SurfaceFactory::create`].
#[derive(Debug, Clone)]
pub struct SurfaceEvents {
	panel_id: PanelId,
	tx: MsgSender,
}

impl SurfaceEvents {
	pub(crate) fn new(panel_id: PanelId, tx: MsgSender) -> Self {
		Self { panel_id, tx }
	}

	pub fn panel_id(&self) -> &PanelId {
		&self.panel_id
	}

	/// Decodes and forwards one raw JSON message from the surface.
	pub fn message(&self, raw: &str) -> Result<()> {
		let message = InboundMessage::decode(raw).inspect_err(|err| {
			tracing::debug!(panel_id = %self.panel_id, error = %err, "panels.surface.undecodable");
		})?;
		self.send(message)
	}

	/// Forwards one decoded message.
	pub fn send(&self, message: InboundMessage) -> Result<()> {
		self.tx
			.send(PanelMsg::Surface {
				panel_id: self.panel_id.clone(),
				message,
			})
			.map_err(|_| Error::Stopped)
	}

	/// Reports that the user closed the surface.
	pub fn closed(&self) -> Result<()> {
		self.tx.send(PanelMsg::SurfaceClosed(self.panel_id.clone())).map_err(|_| Error::Stopped)
	}
}
