//! Transcript client for ollachat
//!
//! Drives one relay call per user turn, reassembles the normalized event
//! stream into a growing assistant message, and renders the transcript in an
//! interactive terminal session.

pub mod auth;
pub mod error;
pub mod logger;
pub mod repl;
pub mod session;
pub mod stream;
pub mod transcript;

pub use auth::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::ClientError;
pub use logger::ConversationLogger;
pub use repl::{run_repl, ReplConfig};
pub use session::ChatSession;
pub use stream::{EventStream, RelayClient};
pub use transcript::{Transcript, TurnState};
