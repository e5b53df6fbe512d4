//! Orchestrator configuration.

use serde::Deserialize;

use crate::Result;

/// Total character budget for a panel title.
pub const DEFAULT_TITLE_BUDGET: usize = 22;

/// User-visible text shown when a result future rejects.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Something went wrong.";

/// Orchestrator settings. Every field has a default, so a partial TOML table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PanelsConfig {
	/// Title character budget. Split in half between input and file name when a
	/// file is part of the query.
	pub title_budget: usize,
	/// Message attached to the empty result list of a failed search.
	pub failure_message: String,
	/// Whether resolved searches are appended to the history store.
	pub record_history: bool,
}

impl Default for PanelsConfig {
	fn default() -> Self {
		Self {
			title_budget: DEFAULT_TITLE_BUDGET,
			failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
			record_history: true,
		}
	}
}

impl PanelsConfig {
	/// Parses a TOML document.
	pub fn from_toml(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}
}
