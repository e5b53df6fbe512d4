//! Result panels for a code search assistant.
//!
//! A search engine hands over queries plus result futures; this crate turns them
//! into display panels, pushes content once each surface is ready, routes the
//! messages surfaces send back, and drives the single live-search panel.
//!
//! Start with [`spawn_orchestrator`] and talk to the control task through the
//! returned [`OrchestratorHandle`]. Collaborators are supplied as a [`Host`].

pub mod config;
mod error;
pub mod host;
pub mod live_search;
pub mod msg;
pub mod orchestrator;
pub mod readiness;
pub mod registry;
mod router;
pub mod runtime;
pub mod session;
mod task;
pub mod title;

#[cfg(test)]
mod testing;

pub use config::PanelsConfig;
pub use error::{Error, Result};
pub use host::{
	AutocompleteProvider, AutocompleteRequest, DisplaySurface, ExternalOpener, HistoryQuery, HistoryStore, Host, LiveSearchCommand, Notifier, SearchEngine,
	SearchRequest, StatusBar, StatusIndicator, SurfaceFactory, SurfaceInit, Telemetry,
};
pub use live_search::{LiveSearch, LiveSearchState};
pub use msg::{PanelMsg, ResultFuture, SearchOutput, SurfaceEvents};
pub use orchestrator::PanelOrchestrator;
pub use registry::{PanelGeneration, PanelHandle, PanelRegistry};
pub use runtime::{OrchestratorHandle, OrchestratorRuntime, spawn_orchestrator};
pub use session::{Metadata, PanelEvent, Session, SessionId, TimedEvent};
pub use task::TaskClass;
