use quarry_protocol::DecodeError;

/// Errors surfaced by the panel orchestrator and its collaborators.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The control task has stopped; no further messages are accepted.
	#[error("panel orchestrator stopped")]
	Stopped,
	/// A surface emitted a message that does not decode.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// A display surface could not be created or refused a push.
	#[error("surface error: {0}")]
	Surface(String),
	/// A result future rejected.
	#[error("search failed: {0}")]
	Search(String),
	/// A host collaborator (history, autocomplete, opener) failed.
	#[error("{0}")]
	Collaborator(String),
	/// Configuration did not parse.
	#[error("invalid configuration: {0}")]
	Config(#[from] toml::de::Error),
}

/// Result alias for panel operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
