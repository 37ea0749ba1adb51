use std::env;
use std::time::Duration;

/// Upstream base URL used when `OLLAMA_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ceiling for one whole relay call. Not a per-chunk timeout.
pub const DEFAULT_MAX_CALL_DURATION: Duration = Duration::from_secs(30);

/// Configuration for the relay's upstream connection.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Base URL of the model-serving backend.
    pub base_url: String,
    /// Optional bearer credential, sent as `Authorization: Bearer <key>`.
    pub api_key: Option<String>,
    /// Optional device key, sent as `X-Device-Key`.
    pub device_key: Option<String>,
    /// Maximum duration of one relay call, upstream and fallback alike.
    pub max_call_duration: Duration,
    /// Print per-call request details.
    pub verbose: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            device_key: None,
            max_call_duration: DEFAULT_MAX_CALL_DURATION,
            verbose: false,
        }
    }
}

impl RelayConfig {
    /// Build the configuration from environment variables.
    ///
    /// `OLLAMA_API_URL` falls back to the default base URL. `OLLAMA_API_KEY`
    /// and `OLLAMA_DEVICE_KEY` are optional; empty values count as absent so
    /// the corresponding headers are omitted rather than sent blank.
    pub fn from_env() -> Self {
        Self {
            base_url: normalize_base_url(
                &env::var("OLLAMA_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            ),
            api_key: env_opt("OLLAMA_API_KEY"),
            device_key: env_opt("OLLAMA_DEVICE_KEY"),
            max_call_duration: DEFAULT_MAX_CALL_DURATION,
            verbose: false,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    pub fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url)
    }

    pub fn pull_url(&self) -> String {
        format!("{}/api/pull", self.base_url)
    }

    pub fn delete_url(&self) -> String {
        format!("{}/api/delete", self.base_url)
    }
}

fn env_opt(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_url_appends_fixed_path() {
        let config = RelayConfig::default().with_base_url("http://localhost:11434/");
        assert_eq!(config.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn base_url_trailing_slashes_are_normalized() {
        let config = RelayConfig::default().with_base_url("http://models.internal:8080//");
        assert_eq!(config.base_url, "http://models.internal:8080");
        assert_eq!(config.tags_url(), "http://models.internal:8080/api/tags");
    }
}
