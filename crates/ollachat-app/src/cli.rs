use std::net::SocketAddr;

use clap::{Parser, Subcommand};

/// CLI arguments for ollachat
#[derive(Parser)]
#[command(name = "ollachat")]
#[command(about = "Ollama CLI - streaming chat relay and terminal client")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Relay URL used by client commands
    #[arg(long, value_name = "URL", default_value = "http://localhost:3000")]
    pub relay: String,

    /// Model to chat with
    #[arg(long, value_name = "MODEL", default_value = ollachat_types::DEFAULT_MODEL)]
    pub model: String,

    /// Print per-call request details
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable the conversation log
    #[arg(long)]
    pub no_log: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server
    Serve {
        /// Address to bind
        #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },

    /// Chat interactively through the relay (default)
    Chat,

    /// List models installed on the upstream backend
    Models,

    /// Store a dashboard token
    Login {
        /// Token captured from the auth callback
        token: String,
    },

    /// Clear the stored token
    Logout,

    /// Show whether a token is stored
    Whoami,
}
