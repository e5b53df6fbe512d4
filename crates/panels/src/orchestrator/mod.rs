//! Panel orchestrator: the single owner of panel, readiness and live-search state.
//!
//! # Purpose
//!
//! - Turn search engine output into panels: resolve or create the target panel,
//!   show a loading view, and push results once the surface is ready.
//! - Own the live-search designation and its status indicator.
//! - Apply inbound surface messages (see `router`) against the same state.
//!
//! # Mental model
//!
//! - Everything here runs on the control task, one [`PanelMsg`] at a time.
//! - Result futures and async collaborator calls run on spawned tasks whose only
//!   effect is posting a follow-up message onto the bus.
//! - A push never goes straight to a surface. It passes the [`ReadinessTracker`]
//!   first, which parks it until the surface has sent `uiReady`.
//! - A panel closed while work is in flight simply stops being found; late
//!   results and replies become silent no-ops.
//!
//! # Key types
//!
//! | Type | Meaning | Constraints | Constructed / mutated in |
//! |---|---|---|---|
//! | [`PanelOrchestrator`] | Control-task state owner | MUST be the only writer of registry, readiness and live-search state | `PanelOrchestrator::apply` |
//! | [`PanelRegistry`] | Live panels in creation order | MUST hold at most one live-search designation | `PanelOrchestrator::open_panel`, `PanelOrchestrator::close_panel` |
//! | [`ReadinessTracker`] | Per-panel push gate | MUST share the registry entry's lifecycle | `PanelOrchestrator::open_panel`, `PanelOrchestrator::mark_ready` |
//! | [`LiveSearch`] | Live-search state machine | MUST be the only writer of the designation | `PanelOrchestrator::show_results`, `PanelOrchestrator::live_search_command` |
//! | [`Session`](crate::Session) | Telemetry scope of the shown query | MUST be replaced, not mutated, per new query | `PanelOrchestrator::open_panel`, `router` |
//!
//! # Invariants
//!
//! 1. No push reaches a surface before its `uiReady`.
//!    - Enforced in: `PanelOrchestrator::update_content`
//!    - Tested by: `orchestrator::tests::pushes_wait_for_ui_ready`
//!    - Failure symptom: the surface drops results sent during its own initialization.
//! 2. Each push is delivered at most once.
//!    - Enforced in: `ReadinessTracker::mark_ready`
//!    - Tested by: `orchestrator::tests::duplicate_ui_ready_does_not_redeliver`
//!    - Failure symptom: result lists flicker or duplicate.
//! 3. Closing a panel removes its registry, readiness and designation state together.
//!    - Enforced in: `PanelOrchestrator::close_panel`
//!    - Tested by: `orchestrator::tests::closing_live_panel_clears_everything_once`
//!    - Failure symptom: live-search commands target a surface that no longer exists.
//! 4. A rejected result future degrades to an empty list and never escapes.
//!    - Enforced in: `PanelOrchestrator::settle_results`
//!    - Tested by: `orchestrator::tests::rejected_results_show_failure`
//!    - Failure symptom: the panel spins in the loading state forever.
//! 5. Settled results are charged to the session and panel opening of the query
//!    that produced them.
//!    - Enforced in: `PanelOrchestrator::settle_results`
//!    - Tested by: `orchestrator::tests::overlapping_queries_keep_their_own_sessions`,
//!      `orchestrator::tests::results_do_not_leak_into_a_reopened_panel`
//!    - Failure symptom: latency is attributed to the wrong search, or an old
//!      query's results replace a newer panel's content.

use std::ops::ControlFlow;

use quarry_protocol::{
	AutocompleteList, ContentUpdate, HistoryRecord, LiveSearchAction, OutboundDirective, PanelId, Query, SearchHistoryList, SuggestionItem,
};
use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use crate::config::PanelsConfig;
use crate::host::{Host, SurfaceInit};
use crate::live_search::{LiveSearch, Transition};
use crate::msg::{MsgSender, PanelMsg, ResultsSettled, SearchOutput, SurfaceEvents};
use crate::readiness::{Admission, ReadinessTracker};
use crate::registry::{PanelHandle, PanelRegistry};
use crate::session::{Metadata, PanelEvent, SessionClock};
use crate::task::{TaskClass, spawn};
use crate::title::title_for_query;


pub struct PanelOrchestrator {
	pub(crate) config: PanelsConfig,
	pub(crate) host: Host,
	pub(crate) registry: PanelRegistry,
	pub(crate) readiness: ReadinessTracker,
	pub(crate) live_search: LiveSearch,
	pub(crate) sessions: SessionClock,
	pub(crate) tx: MsgSender,
}

impl PanelOrchestrator {
	/// Creates an orchestrator posting follow-up work onto `tx`.
	pub fn new(config: PanelsConfig, host: Host, tx: MsgSender) -> Self {
		Self {
			config,
			host,
			registry: PanelRegistry::new(),
			readiness: ReadinessTracker::new(),
			live_search: LiveSearch::new(),
			sessions: SessionClock::new(),
			tx,
		}
	}

	pub fn registry(&self) -> &PanelRegistry {
		&self.registry
	}

	pub fn readiness(&self) -> &ReadinessTracker {
		&self.readiness
	}

	pub fn live_search(&self) -> &LiveSearch {
		&self.live_search
	}

	/// Applies one bus message. Breaks only on shutdown.
	pub fn apply(&mut self, msg: PanelMsg) -> ControlFlow<()> {
		match msg {
			PanelMsg::ShowResults(output) => self.show_results(output),
			PanelMsg::Surface { panel_id, message } => self.route(&panel_id, message),
			PanelMsg::SurfaceClosed(panel_id) => self.close_panel(&panel_id),
			PanelMsg::ResultsSettled(settled) => self.settle_results(settled),
			PanelMsg::HistoryListed { panel_id, records } => {
				self.update_content(&panel_id, OutboundDirective::SearchHistory(SearchHistoryList { search_history: records }));
			}
			PanelMsg::AutocompleteResolved { panel_id, input, suggestions } => {
				self.update_content(
					&panel_id,
					OutboundDirective::Autocomplete(AutocompleteList {
						input,
						autocomplete_suggestions: suggestions,
					}),
				);
			}
			PanelMsg::LiveSearch(action) => self.live_search_command(action),
			PanelMsg::RevealMostRecent => {
				if let Some((_, panel)) = self.registry.most_recent_panel_mut() {
					panel.surface.reveal();
				}
			}
			PanelMsg::Flush(reply) => {
				let _ = reply.send(());
			}
			PanelMsg::Shutdown => return ControlFlow::Break(()),
		}
		ControlFlow::Continue(())
	}

	/// Shows a query's results, creating or reusing its panel.
	pub fn show_results(&mut self, output: SearchOutput) {
		let started = tokio::time::Instant::now();
		let SearchOutput { query, results } = output;
		let panel_id = self.target_panel_id(&query);
		let title = title_for_query(&query, self.config.title_budget);
		trace!(panel_id = %panel_id, implicit = query.implicit, trigger = query.trigger.as_str(), "panels.show_results");

		if let Some(panel) = self.registry.get_mut(&panel_id) {
			panel.surface.set_title(&title);
			panel.surface.reveal();
			if query.implicit {
				panel.session = self.sessions.mint(&panel_id);
				panel.session.record(self.host.telemetry.as_ref(), PanelEvent::Search, search_metadata(&query));
			}
			panel.query = query.clone();
		} else if !self.open_panel(&panel_id, &query, title) {
			return;
		}
		let Some(panel) = self.registry.get(&panel_id) else {
			return;
		};
		let generation = panel.generation();
		let session = panel.session.clone();

		let tx = self.tx.clone();
		let settled_panel = panel_id.clone();
		let settled_query = query.clone();
		spawn(TaskClass::Results, async move {
			let outcome = results.await;
			let _ = tx.send(PanelMsg::ResultsSettled(ResultsSettled {
				panel_id: settled_panel,
				generation,
				session,
				query: settled_query,
				started,
				outcome,
			}));
		});

		if query.implicit {
			self.live_search.activate(&panel_id, &mut self.registry, self.host.status_bar.as_ref());
		}
	}

	/// Implicit queries land in the designated live-search panel when there is one.
	fn target_panel_id(&self, query: &Query) -> PanelId {
		if query.implicit {
			if let Some(live) = self.registry.live_search_panel_id() {
				return live.clone();
			}
		}
		query.id.clone()
	}

	fn open_panel(&mut self, panel_id: &PanelId, query: &Query, title: String) -> bool {
		let init = SurfaceInit {
			panel_id: panel_id.clone(),
			title,
			initial: ContentUpdate::loading(query),
		};
		let events = SurfaceEvents::new(panel_id.clone(), self.tx.clone());
		let surface = match self.host.surfaces.create(init, events) {
			Ok(surface) => surface,
			Err(err) => {
				warn!(panel_id = %panel_id, error = %err, "panels.open.failed");
				return false;
			}
		};

		let session = self.sessions.mint(panel_id);
		session.record(self.host.telemetry.as_ref(), PanelEvent::Search, search_metadata(query));
		let handle = PanelHandle::new(surface, session, query.clone());
		if let Some(mut replaced) = self.registry.save(panel_id.clone(), handle) {
			replaced.surface.dispose();
		}
		self.readiness.track(panel_id.clone());
		debug!(panel_id = %panel_id, panels = self.registry.len(), "panels.open");
		true
	}

	/// Charges settled results to the query that produced them.
	///
	/// `resultsShown` goes to the session captured when the query was shown, even
	/// if a newer query has since taken over the panel. Results for a panel that
	/// was closed, or closed and reopened under the same id, are not pushed.
	/// History is appended either way.
	pub(crate) fn settle_results(&mut self, settled: ResultsSettled) {
		let ResultsSettled {
			panel_id,
			generation,
			session,
			query,
			started,
			outcome,
		} = settled;
		let current = self.registry.is_current(&panel_id, generation);
		if !current {
			debug!(panel_id = %panel_id, session = session.id().0, "panels.results.stale");
		}

		let suggestions = match outcome {
			Ok(mut suggestions) => {
				SuggestionItem::resequence(&mut suggestions);
				if current {
					let latency = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
					let mut metadata = Metadata::new();
					metadata.insert("latencyMs".into(), json!(latency));
					metadata.insert("resultCount".into(), json!(suggestions.len()));
					session.record(self.host.telemetry.as_ref(), PanelEvent::ResultsShown, metadata);
					self.update_content(&panel_id, OutboundDirective::Content(ContentUpdate::results(&query, suggestions.clone())));
				}
				suggestions
			}
			Err(err) => {
				warn!(panel_id = %panel_id, error = %err, "panels.results.rejected");
				if current {
					let failure = ContentUpdate::failure(&query, self.config.failure_message.clone());
					self.update_content(&panel_id, OutboundDirective::Content(failure));
				}
				Vec::new()
			}
		};

		self.append_history(query, suggestions);
	}

	/// Pushes a directive to a panel once its surface is ready.
	///
	/// Pushes to unknown panels are discarded; this is the benign outcome of a
	/// panel closing while work for it was in flight.
	pub fn update_content(&mut self, panel_id: &PanelId, directive: OutboundDirective) {
		let Some(panel) = self.registry.get_mut(panel_id) else {
			debug!(panel_id = %panel_id, "panels.push.no_panel");
			return;
		};
		match self.readiness.admit(panel_id, directive) {
			Admission::Deliver(directive) => deliver(panel, panel_id, &directive),
			Admission::Parked => trace!(panel_id = %panel_id, parked = self.readiness.parked(panel_id), "panels.push.parked"),
			Admission::Untracked => debug!(panel_id = %panel_id, "panels.push.untracked"),
		}
	}

	/// Handles the surface's readiness signal, flushing parked pushes in order.
	pub(crate) fn mark_ready(&mut self, panel_id: &PanelId) {
		let Some(panel) = self.registry.get_mut(panel_id) else {
			debug!(panel_id = %panel_id, "panels.ready.no_panel");
			return;
		};
		if self.readiness.is_ready(panel_id) {
			debug!(panel_id = %panel_id, "panels.ready.duplicate");
			return;
		}
		let Some(parked) = self.readiness.mark_ready(panel_id) else {
			return;
		};
		trace!(panel_id = %panel_id, flushed = parked.len(), "panels.ready");
		for directive in &parked {
			deliver(panel, panel_id, directive);
		}
	}

	/// Drops every trace of a panel the user closed. Closing twice is a no-op.
	pub fn close_panel(&mut self, panel_id: &PanelId) {
		if !self.registry.contains(panel_id) {
			debug!(panel_id = %panel_id, "panels.close.unknown");
			return;
		}
		self.live_search.panel_closed(panel_id, &mut self.registry);
		self.readiness.forget(panel_id);
		if let Some(mut panel) = self.registry.delete(panel_id) {
			panel.surface.dispose();
		}
		debug!(panel_id = %panel_id, panels = self.registry.len(), "panels.close");
	}

	/// Runs a live-search transition and pushes its directive to the affected panel.
	pub fn live_search_command(&mut self, action: LiveSearchAction) {
		let transition = self.live_search.apply(action, &mut self.registry, self.host.telemetry.as_ref());
		let Some(Transition { panel_id, action }) = transition else {
			trace!(action = action.as_str(), state = ?self.live_search.state(), "panels.live_search.ignored");
			return;
		};
		self.update_content(&panel_id, OutboundDirective::live_search(action));
	}

	fn append_history(&self, query: Query, suggestions: Vec<SuggestionItem>) {
		if !self.config.record_history {
			return;
		}
		let history = self.host.history.clone();
		let record = HistoryRecord::capture(query, suggestions);
		spawn(TaskClass::Background, async move {
			if let Err(err) = history.add_record(record).await {
				warn!(error = %err, "panels.history.append_failed");
			}
		});
	}

	/// Disposes every surface and the status indicator.
	pub fn dispose_all(&mut self) {
		self.live_search.dispose();
		for (panel_id, mut panel) in self.registry.drain() {
			trace!(panel_id = %panel_id, "panels.dispose");
			panel.surface.dispose();
		}
		self.readiness.clear();
	}
}

fn deliver(panel: &mut PanelHandle, panel_id: &PanelId, directive: &OutboundDirective) {
	if let Err(err) = panel.surface.post(directive) {
		warn!(panel_id = %panel_id, error = %err, "panels.push.failed");
	}
}

/// Metadata attached to every `search` event.
pub(crate) fn search_metadata(query: &Query) -> Metadata {
	let mut metadata = Metadata::new();
	metadata.insert("input".into(), Value::String(query.input.clone()));
	metadata.insert("trigger".into(), Value::String(query.trigger.as_str().into()));
	metadata.insert("implicit".into(), Value::Bool(query.implicit));
	metadata.insert("queryContext".into(), serde_json::to_value(&query.query_context).unwrap_or(Value::Null));
	if let Some(selection) = &query.code_selection {
		metadata.insert("fileName".into(), Value::String(selection.file_name().into()));
	}
	metadata
}
