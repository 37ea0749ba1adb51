use async_stream::stream;
use futures_util::StreamExt;
use serde::Deserialize;

use ollachat_types::{decode_frame, ChatMessage, RelayRequest, StreamEvent};

use crate::error::ClientError;

/// Decoded events from one relay call, in arrival order.
///
/// Ends after the terminal sentinel; a transport failure mid-stream yields
/// one `Err` and then ends.
pub type EventStream = futures::stream::BoxStream<'static, Result<StreamEvent, ClientError>>;

/// HTTP client for the relay endpoint.
pub struct RelayClient {
    http: reqwest::Client,
    chat_url: String,
    models_url: String,
}

impl RelayClient {
    pub fn new(relay_url: &str) -> Self {
        let base = relay_url.trim().trim_end_matches('/');
        Self {
            http: reqwest::Client::new(),
            chat_url: format!("{}/api/chat", base),
            models_url: format!("{}/api/models", base),
        }
    }

    /// Open one relay call and return its decoded event stream.
    pub async fn open(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<EventStream, ClientError> {
        let request = RelayRequest {
            messages: messages.to_vec(),
            model: model.to_string(),
        };

        let response = self
            .http
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let mut bytes = response.bytes_stream();
        let events = stream! {
            let mut buffer = String::new();
            loop {
                match bytes.next().await {
                    Some(Ok(chunk)) => {
                        buffer.push_str(&String::from_utf8_lossy(&chunk));
                        while let Some(newline) = buffer.find('\n') {
                            let line: String = buffer.drain(..=newline).collect();
                            // Malformed frames are skipped, not fatal.
                            if let Some(event) = decode_frame(&line) {
                                let done = matches!(event, StreamEvent::Done);
                                yield Ok(event);
                                if done {
                                    return;
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        yield Err(ClientError::Transport(e.to_string()));
                        return;
                    }
                    None => return,
                }
            }
        };

        Ok(events.boxed())
    }

    /// Installed model names, via the relay's registry proxy.
    pub async fn list_models(&self) -> Result<Vec<String>, ClientError> {
        #[derive(Deserialize)]
        struct ModelsResponse {
            #[serde(default)]
            models: Vec<String>,
        }

        let response = self
            .http
            .get(&self.models_url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let models: ModelsResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(models.models)
    }
}
