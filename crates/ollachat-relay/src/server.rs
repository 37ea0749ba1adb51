use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use tower_http::cors::{Any, CorsLayer};

use crate::config::RelayConfig;
use crate::registry::ModelRegistry;
use crate::routes::{self, AppState};
use crate::upstream::UpstreamClient;

/// Relay server configuration
pub struct RelayServerConfig {
    pub bind_addr: SocketAddr,
    pub relay: RelayConfig,
}

/// Relay server instance
pub struct RelayServer {
    config: RelayServerConfig,
}

impl RelayServer {
    pub fn new(config: RelayServerConfig) -> Self {
        Self { config }
    }

    /// Start the relay server
    pub async fn start(self) -> Result<()> {
        let state = AppState {
            upstream: Arc::new(UpstreamClient::new(self.config.relay.clone())),
            registry: Arc::new(ModelRegistry::new(self.config.relay.clone())),
            max_call_duration: self.config.relay.max_call_duration,
        };

        // Browser front-ends call the relay cross-origin during development
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = routes::create_router(state).layer(cors);

        println!(
            "{} Relay starting on http://{}",
            "🌐".cyan(),
            self.config.bind_addr
        );
        println!(
            "   Chat endpoint: http://{}/api/chat",
            self.config.bind_addr
        );
        println!(
            "{}",
            format!("   Upstream: {}", self.config.relay.base_url).bright_black()
        );

        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
