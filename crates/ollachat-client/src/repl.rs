use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::error::ClientError;
use crate::logger::ConversationLogger;
use crate::session::ChatSession;
use crate::stream::RelayClient;

/// Settings for one interactive session.
pub struct ReplConfig {
    pub relay_url: String,
    pub model: String,
    /// Where conversation logs land; `None` disables logging.
    pub log_dir: Option<PathBuf>,
}

/// Run the interactive transcript client.
pub async fn run_repl(config: ReplConfig) -> Result<()> {
    println!("{}", "🚀 Ollama CLI Interactive Chat".bright_cyan().bold());
    println!(
        "{}",
        format!("Relay: {} • Model: {}", config.relay_url, config.model).bright_black()
    );
    println!(
        "{}",
        "Type /help for commands, /exit to quit\n".bright_black()
    );

    let client = RelayClient::new(&config.relay_url);
    let mut session = ChatSession::new(client, config.model.clone());

    let mut logger = match &config.log_dir {
        Some(dir) => match ConversationLogger::new(dir).await {
            Ok(l) => Some(l),
            Err(e) => {
                eprintln!("Logging disabled: {}", e);
                None
            }
        },
        None => None,
    };

    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline("👤 You: ") {
            Ok(line) => {
                let input = line.trim().to_string();
                if input.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&input);

                if let Some(command) = input.strip_prefix('/') {
                    if handle_command(command, &mut session).await? {
                        break;
                    }
                    continue;
                }

                run_turn(&mut session, &input, logger.as_mut()).await;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", "👋 Goodbye!".bright_black());
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(logger) = &mut logger {
        logger.shutdown().await;
    }

    Ok(())
}

/// Drive one streamed turn, rendering chunks as they arrive.
async fn run_turn(session: &mut ChatSession, input: &str, logger: Option<&mut ConversationLogger>) {
    print!("{} ", "🤖".cyan());
    let _ = io::stdout().flush();

    let mut on_chunk = |chunk: &str| {
        // Per-chunk flush keeps the terminal caught up with the stream.
        print!("{}", chunk);
        let _ = io::stdout().flush();
    };

    let result = session.submit(input, &mut on_chunk).await;
    println!();

    match result {
        Ok(()) => {
            if let Some(logger) = logger {
                logger.log("user", input, None).await;
                let reply = session.transcript().last_text().unwrap_or_default();
                logger.log("assistant", &reply, Some(session.model())).await;
            }
        }
        Err(ClientError::EmptyInput) => {}
        Err(e) => {
            // The session already recorded a system message for this.
            eprintln!("{} {}", "❌".red(), e);
            if let Some(logger) = logger {
                logger.log("system", &e.to_string(), None).await;
            }
        }
    }
    println!();
}

/// Handle a slash command; returns true when the REPL should exit.
async fn handle_command(command: &str, session: &mut ChatSession) -> Result<bool> {
    let mut parts = command.splitn(2, ' ');
    let name = parts.next().unwrap_or_default().to_lowercase();
    let args = parts.next().unwrap_or_default().trim();

    match name.as_str() {
        "exit" | "quit" => {
            println!("{}", "👋 Goodbye!".bright_black());
            return Ok(true);
        }
        "help" => {
            println!(
                "\nAvailable commands:\n\
                 \x20 /help            Show this help message\n\
                 \x20 /models          List installed models\n\
                 \x20 /switch <model>  Switch to a different model\n\
                 \x20 /clear           Clear the conversation\n\
                 \x20 /exit            Exit the chat\n"
            );
        }
        "models" => match session.client().list_models().await {
            Ok(models) if models.is_empty() => {
                println!("{}", "No models installed.".yellow());
            }
            Ok(models) => {
                println!("\n📦 Installed models:");
                for model in models {
                    let marker = if model == session.model() { "→" } else { " " };
                    println!("  {} {}", marker, model);
                }
                println!();
            }
            Err(e) => eprintln!("{} {}", "❌".red(), e),
        },
        "switch" => {
            if args.is_empty() {
                eprintln!("{} Usage: /switch <model>", "❌".red());
            } else {
                session.set_model(args.to_string());
                println!("{} Switched to {}", "✅".green(), args);
            }
        }
        "clear" => {
            session.transcript_mut().clear();
            println!("{}", "💭 Conversation history cleared.".bright_black());
        }
        other => {
            eprintln!("{} Unknown command: /{}", "❌".red(), other);
        }
    }

    Ok(false)
}
