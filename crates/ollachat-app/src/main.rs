use std::env;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use ollachat_client::{
    run_repl, CredentialStore, FileCredentialStore, RelayClient, ReplConfig,
};
use ollachat_relay::{RelayConfig, RelayServer, RelayServerConfig};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { bind }) => {
            let mut relay = RelayConfig::from_env();
            relay.verbose = cli.verbose;

            let server = RelayServer::new(RelayServerConfig {
                bind_addr: bind,
                relay,
            });
            server.start().await
        }

        Some(Commands::Models) => {
            let client = RelayClient::new(&cli.relay);
            let models = client.list_models().await?;
            if models.is_empty() {
                println!("{}", "No models installed.".yellow());
            } else {
                for model in models {
                    println!("{}", model);
                }
            }
            Ok(())
        }

        Some(Commands::Login { token }) => {
            let store = FileCredentialStore::default_location()?;
            store.set(&token)?;
            println!("{} Token stored at {}", "✅".green(), store.path().display());
            Ok(())
        }

        Some(Commands::Logout) => {
            let store = FileCredentialStore::default_location()?;
            store.clear()?;
            println!("{} Token cleared", "✅".green());
            Ok(())
        }

        Some(Commands::Whoami) => {
            let store = FileCredentialStore::default_location()?;
            match store.get() {
                Some(_) => println!("{} Logged in", "🔑".cyan()),
                None => println!("{}", "Not logged in".bright_black()),
            }
            Ok(())
        }

        Some(Commands::Chat) | None => {
            let log_dir = if cli.no_log {
                None
            } else {
                Some(env::current_dir()?)
            };

            run_repl(ReplConfig {
                relay_url: cli.relay,
                model: cli.model,
                log_dir,
            })
            .await
        }
    }
}
