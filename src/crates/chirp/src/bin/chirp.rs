//! chirp CLI - talk to X in plain language
//!
//! Main entry point for the chirp command-line tool.

use anyhow::Context;
use chirp::config::{load_config, CliOverrides};
use chirp::{app, health, output, repl};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chirp")]
#[command(about = "chirp - talk to your X account in plain language through a local LLM", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Extra config file, applied after ~/.chirp and ./.chirp
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Ollama model name
    #[arg(short, long, global = true, env = "CHIRP_MODEL")]
    model: Option<String>,

    /// Ollama server URL
    #[arg(long, global = true)]
    ollama_url: Option<String>,

    /// Model calls allowed per request
    #[arg(long, global = true)]
    max_attempts: Option<u32>,

    /// Turns of conversation to remember
    #[arg(long, global = true)]
    history: Option<usize>,

    /// Disable posting, liking and deleting
    #[arg(long, global = true)]
    read_only: bool,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Chat,

    /// Run a single request and print the response envelope
    Ask {
        /// What you want, e.g. "show me the last 5 tweets from @rustlang"
        utterance: String,

        /// Print only the envelope JSON
        #[arg(long)]
        json: bool,
    },

    /// List the operations the model may choose from
    Ops,

    /// Check that Ollama is running and the model is installed
    Health {
        /// Output format: text (default), json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        model: cli.model.clone(),
        ollama_url: cli.ollama_url.clone(),
        max_attempts: cli.max_attempts,
        history: cli.history,
        read_only: cli.read_only,
    };
    let config = load_config(cli.config.clone(), &overrides)
        .await
        .context("Failed to load configuration")?;

    // Initialize tracing; stderr keeps logs out of the conversation
    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let mut session = app::build_session(&config)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            repl::run(&mut session, stdin, &mut stdout).await?;
            Ok(())
        }
        Commands::Ask { utterance, json } => {
            let mut session = app::build_session(&config)?;
            let report = session.translate_and_execute(&utterance).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report.envelope)?);
            } else {
                print!(
                    "{}",
                    output::render_turn(&report, session.identities().len())?
                );
            }

            if report.envelope.is_success() {
                Ok(())
            } else {
                std::process::exit(1);
            }
        }
        Commands::Ops => {
            print!("{}", output::render_operations(&config.registry()));
            Ok(())
        }
        Commands::Health { format } => {
            let client = app::build_llm(&config)?;
            let report = health::check_llm(&client).await;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", output::render_health(&report));
            }

            if report.is_healthy() {
                Ok(())
            } else {
                Err(anyhow::anyhow!("LLM is not ready"))
            }
        }
    }
}
