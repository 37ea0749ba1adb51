//! Shared data model for ollachat
//!
//! This crate holds the chat message types exchanged between the transcript
//! client and the relay, the normalized stream event format, and the lenient
//! line decoders used on both sides of the wire.

mod event;
mod message;

pub use event::{
    decode_frame, decode_generate_line, encode_frame, StreamEvent, DONE_FRAME, DONE_MARKER,
};
pub use message::{flatten_prompt, ChatMessage, ContentPart, RelayRequest, Role, DEFAULT_MODEL};
