//! Dispatch of decoded surface messages onto orchestrator state.

use quarry_protocol::{InboundMessage, PanelId, SearchMessage, SuggestionEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::host::{AutocompleteRequest, HistoryQuery, SearchRequest};
use crate::msg::PanelMsg;
use crate::orchestrator::{PanelOrchestrator, search_metadata};
use crate::session::{Metadata, PanelEvent};
use crate::task::{TaskClass, spawn};
use crate::title::title_for_query;


impl PanelOrchestrator {
	/// Applies one message from the surface of `panel_id`.
	///
	/// Messages from closed or replaced panels are dropped, `uiReady` included.
	pub(crate) fn route(&mut self, panel_id: &PanelId, message: InboundMessage) {
		trace!(panel_id = %panel_id, command = message.command(), "panels.route");
		if !self.registry.contains(panel_id) {
			debug!(panel_id = %panel_id, command = message.command(), "panels.route.no_panel");
			return;
		}

		match message {
			InboundMessage::UiReady => self.mark_ready(panel_id),
			InboundMessage::Search(search) => self.reissue(panel_id, search),
			InboundMessage::Upvote(event) => self.engage(panel_id, PanelEvent::Upvote, event.fields),
			InboundMessage::Downvote(event) => self.engage(panel_id, PanelEvent::Downvote, event.fields),
			InboundMessage::Stars(event) => self.engage(panel_id, PanelEvent::Stars, event.fields),
			InboundMessage::Feedback(event) => self.engage(panel_id, PanelEvent::Feedback, event.fields),
			InboundMessage::Click(event) => self.click(panel_id, event),
			InboundMessage::Copy(event) => self.engage(panel_id, PanelEvent::Copy, event.fields),
			InboundMessage::OpenSuggestion(event) => self.engage(panel_id, PanelEvent::OpenSuggestion, event.fields),
			InboundMessage::SelectSuggestionText(event) => self.engage(panel_id, PanelEvent::SelectSuggestionText, event.fields),
			InboundMessage::HoverSuggestion(event) => self.engage(panel_id, PanelEvent::HoverSuggestion, event.fields),
			InboundMessage::ClickCodeDetails(event) => self.engage(panel_id, PanelEvent::ClickCodeDetails, event.fields),
			InboundMessage::SelectAutocompleteSuggestion(selection) => {
				self.engage(panel_id, PanelEvent::SelectAutocompleteSuggestion, payload_fields(&selection))
			}
			InboundMessage::AddQueryContext(edit) => self.engage(panel_id, PanelEvent::AddQueryContext, payload_fields(&edit)),
			InboundMessage::RemoveQueryContext(edit) => self.engage(panel_id, PanelEvent::RemoveQueryContext, payload_fields(&edit)),
			InboundMessage::Notify(note) => self.host.notifier.notify(note.severity, &note.message, note.details.as_deref()),
			InboundMessage::GetSearchHistory(request) => self.list_history(panel_id, request.filters),
			InboundMessage::GetAutocomplete(request) => self.autocomplete(panel_id, request.input),
			InboundMessage::LiveSearch(control) => self.live_search_command(control.live_search_state),
		}
	}

	/// Re-issues a query from inside an existing panel under a fresh session.
	///
	/// History replays only redisplay a stored entry, so the engine is skipped.
	fn reissue(&mut self, panel_id: &PanelId, search: SearchMessage) {
		let query = search.into_query(panel_id.clone());
		let title = title_for_query(&query, self.config.title_budget);
		let session = self.sessions.mint(panel_id);
		let Some(panel) = self.registry.get_mut(panel_id) else {
			return;
		};
		panel.surface.set_title(&title);
		session.record(self.host.telemetry.as_ref(), PanelEvent::Search, search_metadata(&query));
		panel.session = session;
		panel.query = query.clone();

		if query.trigger.is_history_replay() {
			debug!(panel_id = %panel_id, "panels.search.history_replay");
			return;
		}
		self.host.engine.search_text(SearchRequest::from(&query));
	}

	/// Records one engagement event on the panel's current session.
	fn engage(&self, panel_id: &PanelId, event: PanelEvent, metadata: Metadata) {
		if let Some(panel) = self.registry.get(panel_id) {
			panel.session.record(self.host.telemetry.as_ref(), event, metadata);
		}
	}

	fn click(&self, panel_id: &PanelId, event: SuggestionEvent) {
		let link = event.link().map(str::to_owned);
		self.engage(panel_id, PanelEvent::Click, event.fields);
		let Some(link) = link else {
			debug!(panel_id = %panel_id, "panels.click.no_link");
			return;
		};
		if let Err(err) = self.host.opener.open_external(&link) {
			warn!(panel_id = %panel_id, link = %link, error = %err, "panels.click.open_failed");
		}
	}

	fn list_history(&self, panel_id: &PanelId, filters: Metadata) {
		let history = self.host.history.clone();
		let tx = self.tx.clone();
		let query = HistoryQuery {
			panel_id: panel_id.clone(),
			filters,
		};
		spawn(TaskClass::Background, async move {
			let panel_id = query.panel_id.clone();
			match history.search_history(query).await {
				Ok(records) => {
					let _ = tx.send(PanelMsg::HistoryListed { panel_id, records });
				}
				Err(err) => warn!(panel_id = %panel_id, error = %err, "panels.history.list_failed"),
			}
		});
	}

	fn autocomplete(&self, panel_id: &PanelId, input: String) {
		let Some(panel) = self.registry.get(panel_id) else {
			return;
		};
		let provider = self.host.autocomplete.clone();
		let tx = self.tx.clone();
		let request = AutocompleteRequest {
			panel_id: panel_id.clone(),
			input,
			query_context: panel.query.query_context.clone(),
		};
		spawn(TaskClass::Background, async move {
			let panel_id = request.panel_id.clone();
			let input = request.input.clone();
			match provider.get_autocomplete(request).await {
				Ok(suggestions) => {
					let _ = tx.send(PanelMsg::AutocompleteResolved { panel_id, input, suggestions });
				}
				Err(err) => warn!(panel_id = %panel_id, error = %err, "panels.autocomplete.failed"),
			}
		});
	}
}

/// Flattens a typed payload back into its wire fields for event metadata.
fn payload_fields<T: Serialize>(payload: &T) -> Metadata {
	match serde_json::to_value(payload) {
		Ok(Value::Object(fields)) => fields,
		_ => Metadata::new(),
	}
}
