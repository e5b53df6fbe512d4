/// Failure decoding one inbound surface message.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
	/// The payload is not valid JSON or does not match any command schema.
	#[error("malformed message: {0}")]
	Malformed(#[from] serde_json::Error),
	/// The payload carries no `command` field.
	#[error("message has no command field")]
	MissingCommand,
}

/// Result alias for protocol decoding.
pub type Result<T, E = DecodeError> = std::result::Result<T, E>;
