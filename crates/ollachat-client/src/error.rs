use thiserror::Error;

/// Errors surfaced by the transcript client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// Empty or whitespace-only input; no user message is created.
    #[error("nothing to send")]
    EmptyInput,

    /// A turn is already in flight on this transcript.
    #[error("a response is still streaming")]
    TurnInFlight,

    /// The relay connection itself failed, before or during the stream.
    #[error("connection to relay failed: {0}")]
    Transport(String),

    /// The relay rejected the call outright.
    #[error("relay returned status {0}")]
    Status(u16),
}
