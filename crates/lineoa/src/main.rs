// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LineOA - operator console for a LINE Official Account.
//!
//! This is the binary entry point: `serve` runs the HTTP console API, every
//! other subcommand performs one console operation against the store.

mod commands;
mod console;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use lineoa_config::LineOaConfig;

use crate::console::Console;

/// LineOA - operator console for a LINE Official Account.
#[derive(Parser, Debug)]
#[command(name = "lineoa", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the standard search path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep all records in memory for this run.
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP console API.
    Serve,
    /// Run a message through the reply pipeline as if a customer sent it.
    Simulate {
        text: String,
        /// Target contact id (defaults to the most recently active contact).
        #[arg(long)]
        contact: Option<String>,
    },
    /// Send one message to every contact.
    Broadcast { text: String },
    /// Manage keyword auto-reply rules.
    Rules {
        #[command(subcommand)]
        action: RulesCommand,
    },
    /// Browse and answer conversations.
    Inbox {
        #[command(subcommand)]
        action: InboxCommand,
    },
    /// Channel and AI settings.
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    /// Headline counters.
    Dashboard,
    /// Interactive AI playground.
    Chat {
        /// Persona instruction for this session.
        #[arg(long)]
        persona: Option<String>,
    },
    /// Rich menu templates and draft validation.
    Richmenu {
        #[command(subcommand)]
        action: RichMenuCommand,
    },
    /// Flex Message payload tools.
    Flex {
        #[command(subcommand)]
        action: FlexCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// List rules, optionally filtered by keyword.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Add an active rule. Keywords are comma-separated.
    Add { keywords: String, response: String },
    /// Replace a rule's keywords and response.
    Edit {
        id: String,
        keywords: String,
        response: String,
    },
    /// Flip a rule between active and inactive.
    Toggle { id: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum InboxCommand {
    /// List contacts, most recent first.
    List {
        /// Filter by display name.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a conversation without marking it read.
    Show { id: String },
    /// Mark a conversation read.
    Read { id: String },
    /// Send a manual reply.
    Reply { id: String, text: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    /// Update individual settings.
    Set {
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        secret: Option<String>,
        #[arg(long)]
        ai: Option<bool>,
        #[arg(long)]
        persona: Option<String>,
        #[arg(long)]
        save_logs: Option<bool>,
    },
    /// Show the webhook URL to register with LINE.
    Webhook {
        /// Run the (simulated) connection check.
        #[arg(long)]
        check: bool,
    },
}

#[derive(Subcommand, Debug)]
enum RichMenuCommand {
    Templates,
    /// Validate a draft JSON file and print the Messaging API object.
    Validate { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum FlexCommand {
    /// Print the starter bubble.
    Sample,
    /// Validate and pretty-print a payload file.
    Validate { file: PathBuf },
}

fn load_config(path: Option<&PathBuf>) -> LineOaConfig {
    let loaded = match path {
        Some(path) => lineoa_config::load_and_validate_path(path),
        None => lineoa_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            lineoa_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber with an env-filter.
///
/// Logs go to stderr so command output stays clean on stdout.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lineoa={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());
    init_tracing(&config.console.log_level);

    let Some(command) = cli.command else {
        println!("lineoa: use --help for available commands");
        return;
    };

    let result = match command {
        // Offline tools need no store.
        Commands::Richmenu { action } => commands::run_richmenu(action, cli.json),
        Commands::Flex { action } => commands::run_flex(action),
        command => match Console::open(config, cli.ephemeral).await {
            Ok(console) => {
                let outcome = dispatch(&console, command, cli.json).await;
                if let Err(e) = console.close().await {
                    tracing::warn!(error = %e, "store did not close cleanly");
                }
                outcome
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn dispatch(
    console: &Console,
    command: Commands,
    json: bool,
) -> Result<(), lineoa_core::LineOaError> {
    match command {
        Commands::Serve => serve::run_serve(console).await,
        Commands::Simulate { text, contact } => {
            commands::run_simulate(console, &text, contact.as_deref(), json).await
        }
        Commands::Broadcast { text } => commands::run_broadcast(console, &text, json).await,
        Commands::Rules { action } => commands::run_rules(console, action, json).await,
        Commands::Inbox { action } => commands::run_inbox(console, action, json).await,
        Commands::Settings { action } => commands::run_settings(console, action, json).await,
        Commands::Dashboard => commands::run_dashboard(console, json).await,
        Commands::Chat { persona } => commands::run_chat(console, persona).await,
        Commands::Richmenu { action } => commands::run_richmenu(action, json),
        Commands::Flex { action } => commands::run_flex(action),
    }
}
