//! Relay server for ollachat
//!
//! Accepts chat requests, flattens them into a single prompt, streams the
//! upstream generate endpoint's output back to the caller as normalized
//! `data:` frames, and degrades to a simulated word-by-word stream when the
//! upstream is unreachable.

pub mod config;
pub mod fallback;
pub mod registry;
pub mod request_log;
pub mod routes;
pub mod server;
pub mod upstream;

pub use config::{RelayConfig, DEFAULT_BASE_URL};
pub use fallback::{fallback_notice, fallback_stream};
pub use registry::ModelRegistry;
pub use routes::{create_router, relay_body_stream, AppState};
pub use server::{RelayServer, RelayServerConfig};
pub use upstream::{ChunkStream, UpstreamClient};
