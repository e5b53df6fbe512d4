//! Messages emitted by a display surface.
//!
//! Every message is one JSON object tagged by its `command` field. Decoding
//! happens once at the surface edge; past that point the orchestrator only sees
//! [`InboundMessage`] variants carrying exactly the fields their command defines.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DecodeError, Result};
use crate::query::{CodeQuery, CodeSelection, PanelId, Query, QueryContext, Trigger};


/// One decoded surface message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum InboundMessage {
	/// The surface finished initializing. Sent once.
	UiReady,
	/// Re-issue a query from inside the panel.
	Search(SearchMessage),
	Upvote(SuggestionEvent),
	Downvote(SuggestionEvent),
	Stars(SuggestionEvent),
	Feedback(SuggestionEvent),
	/// Engagement event that also opens the suggestion's link externally.
	Click(SuggestionEvent),
	Copy(SuggestionEvent),
	OpenSuggestion(SuggestionEvent),
	SelectSuggestionText(SuggestionEvent),
	HoverSuggestion(SuggestionEvent),
	ClickCodeDetails(SuggestionEvent),
	SelectAutocompleteSuggestion(AutocompleteSelection),
	AddQueryContext(QueryContextEdit),
	RemoveQueryContext(QueryContextEdit),
	Notify(NotifyMessage),
	GetSearchHistory(SearchHistoryRequest),
	GetAutocomplete(AutocompleteInput),
	LiveSearch(LiveSearchControl),
}

impl InboundMessage {
	/// Decodes one raw JSON message.
	pub fn decode(raw: &str) -> Result<Self> {
		let value: Value = serde_json::from_str(raw)?;
		Self::from_value(value)
	}

	/// Decodes one already-parsed JSON message.
	pub fn from_value(value: Value) -> Result<Self> {
		if value.get("command").is_none() {
			return Err(DecodeError::MissingCommand);
		}
		Ok(serde_json::from_value(value)?)
	}

	/// Wire name of the command, for diagnostics.
	pub const fn command(&self) -> &'static str {
		match self {
			Self::UiReady => "uiReady",
			Self::Search(_) => "search",
			Self::Upvote(_) => "upvote",
			Self::Downvote(_) => "downvote",
			Self::Stars(_) => "stars",
			Self::Feedback(_) => "feedback",
			Self::Click(_) => "click",
			Self::Copy(_) => "copy",
			Self::OpenSuggestion(_) => "openSuggestion",
			Self::SelectSuggestionText(_) => "selectSuggestionText",
			Self::HoverSuggestion(_) => "hoverSuggestion",
			Self::ClickCodeDetails(_) => "clickCodeDetails",
			Self::SelectAutocompleteSuggestion(_) => "selectAutocompleteSuggestion",
			Self::AddQueryContext(_) => "addQueryContext",
			Self::RemoveQueryContext(_) => "removeQueryContext",
			Self::Notify(_) => "notify",
			Self::GetSearchHistory(_) => "getSearchHistory",
			Self::GetAutocomplete(_) => "getAutocomplete",
			Self::LiveSearch(_) => "liveSearch",
		}
	}
}

/// Payload of a `search` command.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMessage {
	pub text: String,
	#[serde(default)]
	pub context: QueryContext,
	/// Absent means [`Trigger::SearchBarRefinement`].
	#[serde(default)]
	pub trigger: Option<Trigger>,
	#[serde(default)]
	pub code_query: Option<CodeQuery>,
	#[serde(default)]
	pub code_selection: Option<CodeSelection>,
	#[serde(default)]
	pub implicit: bool,
}

impl SearchMessage {
	/// Builds the query this message issues inside `panel_id`.
	pub fn into_query(self, panel_id: PanelId) -> Query {
		Query {
			id: panel_id,
			input: self.text,
			query_context: self.context,
			trigger: self.trigger.unwrap_or_default(),
			code_selection: self.code_selection,
			code_query: self.code_query,
			implicit: self.implicit,
		}
	}
}

/// Free-form engagement payload, kept verbatim for telemetry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionEvent {
	#[serde(flatten)]
	pub fields: Map<String, Value>,
}

impl SuggestionEvent {
	pub fn suggestion_id(&self) -> Option<&Value> {
		self.fields.get("suggestionId")
	}

	/// Target link: a top-level `url`, or the `url` of a nested `suggestion`.
	pub fn link(&self) -> Option<&str> {
		self.fields
			.get("url")
			.or_else(|| self.fields.get("suggestion").and_then(|suggestion| suggestion.get("url")))
			.and_then(Value::as_str)
	}
}

/// Payload of `selectAutocompleteSuggestion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteSelection {
	pub text: String,
	#[serde(default)]
	pub autocomplete_suggestion_selected: String,
	#[serde(default)]
	pub autocomplete_suggestions_count: u32,
}

/// One context tag being added to or removed from the panel's query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextTag {
	pub context: String,
	#[serde(default)]
	pub source: String,
	#[serde(rename = "type", default)]
	pub kind: String,
}

/// Payload of `addQueryContext` / `removeQueryContext`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryContextEdit {
	pub query_context: ContextTag,
}

/// Severity of a host notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Info,
	#[serde(alias = "warn")]
	Warning,
	Error,
}

/// Payload of `notify`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotifyMessage {
	#[serde(rename = "type")]
	pub severity: Severity,
	pub message: String,
	#[serde(default)]
	pub details: Option<String>,
}

/// Payload of `getSearchHistory`. Filter criteria are opaque to the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchHistoryRequest {
	#[serde(default)]
	pub filters: Map<String, Value>,
}

/// Payload of `getAutocomplete`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AutocompleteInput {
	pub input: String,
}

/// Live-search control verb, used both inbound and as an outbound directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LiveSearchAction {
	PauseLiveSearch,
	ResumeLiveSearch,
	StopLiveSearch,
}

impl LiveSearchAction {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::PauseLiveSearch => "pauseLiveSearch",
			Self::ResumeLiveSearch => "resumeLiveSearch",
			Self::StopLiveSearch => "stopLiveSearch",
		}
	}
}

/// Payload of `liveSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSearchControl {
	pub live_search_state: LiveSearchAction,
}
