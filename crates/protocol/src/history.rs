use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::query::{Query, SuggestionItem};

/// One stored search: the query, what it resolved to, and when it was captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
	pub query: Query,
	pub suggestions: Vec<SuggestionItem>,
	pub recorded_at: DateTime<Utc>,
}

impl HistoryRecord {
	/// Captures a record stamped with the current wall-clock time.
	pub fn capture(query: Query, suggestions: Vec<SuggestionItem>) -> Self {
		Self {
			query,
			suggestions,
			recorded_at: Utc::now(),
		}
	}
}
