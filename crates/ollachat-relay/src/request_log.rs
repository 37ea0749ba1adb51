use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;

/// Log an outbound generate request.
///
/// Prints a one-line summary in verbose mode and appends a request record
/// under `logs/` for persistent debugging. Logging never fails a call.
pub fn log_generate_request(url: &str, model: &str, prompt: &str, verbose: bool) {
    if verbose {
        println!(
            "{} {} model={} prompt_chars={}",
            "📡".cyan(),
            url.bright_black(),
            model,
            prompt.chars().count()
        );
    }

    let _ = write_request_file(Path::new("logs"), url, model, prompt);
}

fn write_request_file(dir: &Path, url: &str, model: &str, prompt: &str) -> Result<()> {
    fs::create_dir_all(dir)?;

    let timestamp = Utc::now().format("%Y-%m-%d-%H%M%S%.3f");
    let model_name = model.replace('/', "-");
    let path = dir.join(format!("relay-{}-{}.txt", timestamp, model_name));

    let mut content = String::new();
    content.push_str("RELAY REQUEST LOG\n");
    content.push_str("=================\n\n");
    content.push_str(&format!("Timestamp: {}\n", Utc::now().to_rfc3339()));
    content.push_str(&format!("URL: {}\n", url));
    content.push_str(&format!("Model: {}\n\n", model));
    content.push_str("Prompt:\n");
    content.push_str(prompt);
    content.push('\n');

    fs::write(&path, content)
        .with_context(|| format!("Failed to write request log to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn request_file_records_url_and_model() {
        let dir = TempDir::new().unwrap();
        write_request_file(
            dir.path(),
            "http://localhost:11434/api/generate",
            "llama3.2",
            "hi\nthere",
        )
        .unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let content = fs::read_to_string(entries[0].as_ref().unwrap().path()).unwrap();
        assert!(content.contains("http://localhost:11434/api/generate"));
        assert!(content.contains("Model: llama3.2"));
        assert!(content.contains("hi\nthere"));
    }
}
