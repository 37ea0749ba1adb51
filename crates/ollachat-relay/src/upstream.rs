use anyhow::{anyhow, Result};
use async_stream::stream;
use futures_util::StreamExt;

use ollachat_types::decode_generate_line;

use crate::config::RelayConfig;
use crate::request_log::log_generate_request;

/// A finite, non-restartable sequence of text chunks.
///
/// Both the real upstream reader and the fallback producer yield this shape,
/// so the framing loop never needs to know which one is active.
pub type ChunkStream = futures::stream::BoxStream<'static, String>;

/// HTTP client for the upstream generate endpoint.
pub struct UpstreamClient {
    client: reqwest::Client,
    config: RelayConfig,
}

impl UpstreamClient {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Open a streaming generate call and return its chunks.
    ///
    /// Returns an error when the request cannot be made or the upstream
    /// answers with a non-success status; the route handler converts that
    /// into the fallback stream. A transport failure mid-body simply ends
    /// the chunk sequence, so the caller still terminates cleanly.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<ChunkStream> {
        let url = self.config.generate_url();
        let body = serde_json::json!({
            "model": model,
            "prompt": prompt,
            "stream": true,
        });

        log_generate_request(&url, model, prompt, self.config.verbose);

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }
        if let Some(device_key) = &self.config.device_key {
            request = request.header("X-Device-Key", device_key.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(anyhow!(
                "upstream returned {}: {}",
                status,
                error_body
            ));
        }

        let mut bytes = response.bytes_stream();
        let chunks = stream! {
            let mut buffer = String::new();
            while let Some(chunk) = bytes.next().await {
                let Ok(chunk) = chunk else {
                    // Mid-body transport failure: stop forwarding, the
                    // framing loop still closes the stream with the sentinel.
                    break;
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                // The upstream body is newline-delimited JSON; a chunk may
                // end mid-line, so carry the remainder over.
                while let Some(newline) = buffer.find('\n') {
                    let line: String = buffer.drain(..=newline).collect();
                    if let Some(text) = decode_generate_line(&line) {
                        yield text;
                    }
                }
            }
            // Trailing data without a final newline still counts as a line.
            if let Some(text) = decode_generate_line(&buffer) {
                yield text;
            }
        };

        Ok(chunks.boxed())
    }
}
