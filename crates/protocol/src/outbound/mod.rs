//! Directives pushed from the orchestrator to a display surface.

use serde::{Deserialize, Serialize};

use crate::history::HistoryRecord;
use crate::inbound::LiveSearchAction;
use crate::query::{CodeQuery, CodeSelection, Query, QueryContext, SuggestionItem};


/// One serialized push to a surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundDirective {
	Content(ContentUpdate),
	LiveSearch(LiveSearchDirective),
	SearchHistory(SearchHistoryList),
	Autocomplete(AutocompleteList),
}

impl OutboundDirective {
	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(self)
	}

	pub const fn live_search(action: LiveSearchAction) -> Self {
		Self::LiveSearch(LiveSearchDirective { live_search_action: action })
	}

	pub fn as_content(&self) -> Option<&ContentUpdate> {
		match self {
			Self::Content(update) => Some(update),
			_ => None,
		}
	}
}

/// Full content state of a panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdate {
	pub loading: bool,
	pub query_text: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub context: Option<QueryContext>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub suggestions: Option<Vec<SuggestionItem>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_message: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code_query: Option<CodeQuery>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code_selection: Option<CodeSelection>,
}

impl ContentUpdate {
	fn for_query(query: &Query, loading: bool) -> Self {
		Self {
			loading,
			query_text: query.input.clone(),
			context: (!query.query_context.is_empty()).then(|| query.query_context.clone()),
			suggestions: None,
			error_message: None,
			code_query: query.code_query.clone(),
			code_selection: query.code_selection.clone(),
		}
	}

	/// Initial view rendered while the query is still resolving.
	pub fn loading(query: &Query) -> Self {
		Self::for_query(query, true)
	}

	pub fn results(query: &Query, suggestions: Vec<SuggestionItem>) -> Self {
		Self {
			suggestions: Some(suggestions),
			..Self::for_query(query, false)
		}
	}

	/// Empty result list plus a user-visible failure message.
	pub fn failure(query: &Query, message: impl Into<String>) -> Self {
		Self {
			suggestions: Some(Vec::new()),
			error_message: Some(message.into()),
			..Self::for_query(query, false)
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSearchDirective {
	pub live_search_action: LiveSearchAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryList {
	pub search_history: Vec<HistoryRecord>,
}

/// One completion offered for partially typed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteSuggestion {
	pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteList {
	pub input: String,
	pub autocomplete_suggestions: Vec<AutocompleteSuggestion>,
}
