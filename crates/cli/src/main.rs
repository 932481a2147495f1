//! Consilium CLI: the main entry point.
//!
//! Commands:
//! - `serve`        Start the HTTP API server
//! - `ask`          Answer one question from the terminal
//! - `categories`   Show the active taxonomy
//! - `config`       Print the effective or default configuration
//! - `doctor`       Diagnose configuration and datasets

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "consilium",
    about = "Consilium: question answering over local council decisions",
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
    /// Start the HTTP API server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Answer a single question and print the formatted answer
    Ask {
        /// The question to answer
        query: String,

        /// Use the English taxonomy, dataset and prompts
        #[arg(short, long, conflicts_with = "timpark")]
        english: bool,

        /// Answer from the TimPark parking dataset (no classification)
        #[arg(short, long)]
        timpark: bool,
    },

    /// List the categories queries are classified into
    Categories {
        /// Show the English taxonomy
        #[arg(short, long)]
        english: bool,
    },

    /// Print the effective configuration (secrets redacted)
    Config {
        /// Print the built-in defaults instead
        #[arg(long)]
        default: bool,
    },

    /// Diagnose configuration, credentials and datasets
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Ask {
            query,
            english,
            timpark,
        } => commands::ask::run(query, english, timpark).await?,
        Commands::Categories { english } => commands::categories::run(english).await?,
        Commands::Config { default } => commands::config_cmd::run(default).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
