use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::config::RelayConfig;

/// Thin CRUD client for the upstream model registry.
///
/// Consumed by the marketplace-facing routes only; the streaming core never
/// touches it.
pub struct ModelRegistry {
    client: reqwest::Client,
    config: RelayConfig,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

impl ModelRegistry {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Names of the models installed upstream.
    pub async fn list(&self) -> Result<Vec<String>> {
        let response = self.client.get(self.config.tags_url()).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("registry list failed: {}", response.status()));
        }
        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Install a model by name. Waits for the pull to finish.
    pub async fn pull(&self, name: &str) -> Result<()> {
        let response = self
            .client
            .post(self.config.pull_url())
            .json(&serde_json::json!({ "name": name, "stream": false }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("registry pull failed: {}", response.status()));
        }
        Ok(())
    }

    /// Remove an installed model by name.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.config.delete_url())
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("registry delete failed: {}", response.status()));
        }
        Ok(())
    }
}
