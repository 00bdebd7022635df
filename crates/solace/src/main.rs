// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Solace - a mental health support chat backend.
//!
//! This is the binary entry point for the Solace service and its local
//! command-line chat client.

mod chat;
mod status;

use clap::{Parser, Subcommand};

/// Solace - a mental health support chat backend.
#[derive(Parser, Debug)]
#[command(name = "solace", version, about, long_about = None)]
struct Cli {
    /// Log level when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat session in the terminal.
    Chat {
        /// Send a single message and exit instead of starting a session.
        #[arg(long)]
        once: Option<String>,
    },
    /// Show the effective configuration.
    Status,
    /// Remove expired and deleted session data.
    Sweep,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    // Load and validate configuration at startup.
    let config = match solace_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            solace_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Chat { once }) => chat::run(config, once).await,
        Some(Commands::Status) => status::run(&config),
        Some(Commands::Sweep) => status::sweep(config),
        None => {
            println!("solace: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("solace: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("solace={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
