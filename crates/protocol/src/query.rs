//! Query model shared by the orchestrator, the search engine and display surfaces.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque identifier of one display surface.
///
/// Equals the identifier of the query that opened the panel, except for implicit
/// (live search) queries which target the designated live-search panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for PanelId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for PanelId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for PanelId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// Context tags narrowing a query.
///
/// Each set holds unique tags; order is irrelevant, so sets are kept sorted for
/// stable serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryContext {
	pub must: BTreeSet<String>,
	pub should: BTreeSet<String>,
	pub must_not: BTreeSet<String>,
}

impl QueryContext {
	pub fn is_empty(&self) -> bool {
		self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
	}
}

/// Origin of a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
	/// Typed into the search bar.
	SearchBarInput,
	/// Re-issued from inside an existing panel.
	#[default]
	SearchBarRefinement,
	/// Re-display of a stored history entry; never re-executes the search.
	SearchHistory,
	TerminalLink,
	DebugError,
	DiagnosticError,
	CodeSelection,
	/// Generated by live search.
	LiveSearch,
	#[serde(other)]
	Other,
}

impl Trigger {
	pub const fn is_history_replay(self) -> bool {
		matches!(self, Self::SearchHistory)
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::SearchBarInput => "SearchBarInput",
			Self::SearchBarRefinement => "SearchBarRefinement",
			Self::SearchHistory => "SearchHistory",
			Self::TerminalLink => "TerminalLink",
			Self::DebugError => "DebugError",
			Self::DiagnosticError => "DiagnosticError",
			Self::CodeSelection => "CodeSelection",
			Self::LiveSearch => "LiveSearch",
			Self::Other => "Other",
		}
	}
}

/// Zero-based row/column inside a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
	pub row: u32,
	pub column: u32,
}

/// Code the user had selected when the query was issued.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSelection {
	/// Path of the selected file as reported by the host.
	pub selected_file: String,
	#[serde(default)]
	pub start: Position,
}

impl CodeSelection {
	/// Last path segment of the selected file.
	pub fn file_name(&self) -> &str {
		self.selected_file.rsplit(['/', '\\']).find(|segment| !segment.is_empty()).unwrap_or(&self.selected_file)
	}
}

/// Symbol names extracted from the code surrounding the query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeQuery {
	pub simple_names: Vec<String>,
	pub used_fully_qualified_names: Vec<String>,
}

/// One issued query. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
	pub id: PanelId,
	pub input: String,
	#[serde(default)]
	pub query_context: QueryContext,
	#[serde(default)]
	pub trigger: Trigger,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code_selection: Option<CodeSelection>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code_query: Option<CodeQuery>,
	#[serde(default)]
	pub implicit: bool,
}

impl Query {
	/// Creates an explicit query with empty context.
	pub fn new(id: impl Into<PanelId>, input: impl Into<String>, trigger: Trigger) -> Self {
		Self {
			id: id.into(),
			input: input.into(),
			query_context: QueryContext::default(),
			trigger,
			code_selection: None,
			code_query: None,
			implicit: false,
		}
	}

	/// Creates an implicit (live search) query.
	pub fn implicit(id: impl Into<PanelId>, input: impl Into<String>) -> Self {
		Self {
			implicit: true,
			..Self::new(id, input, Trigger::LiveSearch)
		}
	}

	#[must_use]
	pub fn with_context(mut self, query_context: QueryContext) -> Self {
		self.query_context = query_context;
		self
	}

	#[must_use]
	pub fn with_code_selection(mut self, selection: CodeSelection) -> Self {
		self.code_selection = Some(selection);
		self
	}

	#[must_use]
	pub fn with_code_query(mut self, code_query: CodeQuery) -> Self {
		self.code_query = Some(code_query);
		self
	}
}

/// One search result. The index is its position in the result list, used for
/// display ordering only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionItem {
	pub index: usize,
	pub payload: Value,
}

impl SuggestionItem {
	/// Assigns sequence indices to payloads in list order.
	pub fn sequence(payloads: impl IntoIterator<Item = Value>) -> Vec<Self> {
		payloads.into_iter().enumerate().map(|(index, payload)| Self { index, payload }).collect()
	}

	/// Reassigns indices so they match list positions.
	pub fn resequence(items: &mut [Self]) {
		for (index, item) in items.iter_mut().enumerate() {
			item.index = index;
		}
	}
}
