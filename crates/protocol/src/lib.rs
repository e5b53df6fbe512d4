//! Wire model shared between the panel orchestrator and its display surfaces.
//!
//! * [`Query`] and friends: what a search asks for and where it came from.
//! * [`InboundMessage`]: one decoded surface event, tagged by `command`.
//! * [`OutboundDirective`]: one push from the orchestrator to a surface.
//! * [`HistoryRecord`]: a stored search and what it resolved to.

pub mod error;
pub mod history;
pub mod inbound;
pub mod outbound;
pub mod query;

pub use error::{DecodeError, Result};
pub use history::HistoryRecord;
pub use inbound::{
	AutocompleteInput, AutocompleteSelection, ContextTag, InboundMessage, LiveSearchAction, LiveSearchControl, NotifyMessage, QueryContextEdit,
	SearchHistoryRequest, SearchMessage, Severity, SuggestionEvent,
};
pub use outbound::{AutocompleteList, AutocompleteSuggestion, ContentUpdate, LiveSearchDirective, OutboundDirective, SearchHistoryList};
pub use query::{CodeQuery, CodeSelection, PanelId, Position, Query, QueryContext, SuggestionItem, Trigger};
