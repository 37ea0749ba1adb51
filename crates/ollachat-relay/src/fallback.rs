use std::time::Duration;

use async_stream::stream;
use futures_util::StreamExt;

use crate::upstream::ChunkStream;

/// Fixed delay between words of the simulated stream.
pub const WORD_DELAY: Duration = Duration::from_millis(50);

/// Diagnostic text streamed when the upstream cannot be reached.
///
/// Always names the requested model so the caller can act on the hints.
pub fn fallback_notice(model: &str, error: &str) -> String {
    format!(
        "Error connecting to Ollama API: {error}.\n\n\
         Please make sure:\n\
         1. Ollama is running locally (ollama serve)\n\
         2. The model \"{model}\" is installed (ollama pull {model})\n\
         3. The API URL is correct (default: http://localhost:11434)\n\n\
         This is a fallback response generated by the relay."
    )
}

/// Emit a notice word-by-word on a fixed timer.
///
/// Implements the same finite chunk-stream contract as the upstream reader,
/// so the consuming loop cannot tell a simulated stream from a real one.
pub fn fallback_stream(notice: String) -> ChunkStream {
    stream! {
        for word in notice.split(' ') {
            yield format!("{} ", word);
            tokio::time::sleep(WORD_DELAY).await;
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_names_the_model_and_error() {
        let notice = fallback_notice("llama3.2", "connection refused");
        assert!(notice.contains("llama3.2"));
        assert!(notice.contains("connection refused"));
        assert!(notice.contains("ollama pull llama3.2"));
    }

    #[tokio::test]
    async fn stream_emits_every_word_then_ends() {
        let chunks: Vec<String> = fallback_stream("one two three".to_string())
            .collect()
            .await;
        assert_eq!(chunks, vec!["one ", "two ", "three "]);
    }

    #[tokio::test]
    async fn reassembled_stream_matches_notice_words() {
        let notice = fallback_notice("mistral", "timed out");
        let chunks: Vec<String> = fallback_stream(notice.clone()).collect().await;
        let reassembled = chunks.concat();
        assert!(reassembled.contains("mistral"));
        assert_eq!(
            reassembled.split_whitespace().collect::<Vec<_>>(),
            notice.split_whitespace().collect::<Vec<_>>()
        );
    }
}
