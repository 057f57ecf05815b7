//! rummage CLI — the main entry point.
//!
//! Commands:
//! - `chat` — interactive question/answer session
//! - `ask`  — answer a single question and exit

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "rummage",
    about = "rummage — a research agent that searches Wikipedia and the web",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive question/answer session
    Chat,

    /// Answer a single question and exit
    Ask {
        /// The question to research
        question: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat => commands::chat::run().await?,
        Commands::Ask { question } => commands::ask::run(&question).await?,
    }

    Ok(())
}
