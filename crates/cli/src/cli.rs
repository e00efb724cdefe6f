use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Docent — a document-grounded study assistant.
#[derive(Debug, Parser)]
#[command(name = "docent", version, about)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "docent.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive chat (default when no subcommand is given).
    Chat,
    /// Chat plus a document reader with page navigation.
    Study {
        /// Document to open on start, by catalog number or title.
        doc: Option<String>,
    },
    /// Send a single message and print the response.
    Run {
        /// The message to send.
        message: String,
        /// Output the turn events as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}
