//! objcheck CLI - verify that an image contains the objects you ask about.
//!
//! Sends an image and an instruction to a multimodal LLM (OpenAI, Anthropic,
//! or a self-hosted Ollama) and prints the reply as question/answer pairs.
//!
//! # Usage
//!
//! ```bash
//! # Verify with the configured provider and prompt
//! objcheck verify shelf.jpg
//!
//! # Override provider and prompt, print a table
//! objcheck verify shelf.jpg --provider ollama --prompt "Is there a red mug?" --format table
//!
//! # View configuration
//! objcheck config show
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// objcheck - Image object verification using multimodal LLMs.
#[derive(Parser, Debug)]
#[command(name = "objcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "OBJCHECK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify an image against a prompt
    Verify(cli::verify::VerifyArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_deref().map(cli::expand_path);
    let config = cli::load_config(config_path.as_deref())
        .context("Failed to load the config file given with --config")?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("objcheck v{}", objcheck_core::VERSION);

    match cli.command {
        Commands::Verify(args) => cli::verify::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config_path).await,
    }
}
