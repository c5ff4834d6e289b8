//! Parlance CLI, the main entry point.
//!
//! Commands:
//! - `init`: Write a default config file
//! - `serve`: Start the HTTP API
//! - `generate`: Produce one curriculum and print it as JSON
//! - `scenarios`: List supported languages and scenarios
//! - `doctor`: Diagnose configuration and credentials

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "parlance",
    about = "Parlance: scenario-based language curriculum generator",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "PARLANCE_JSON_LOGS")]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file to ~/.parlance/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a single curriculum and print it as JSON
    Generate {
        /// Target language, e.g. "French" or "es"
        #[arg(short, long)]
        language: String,

        /// Scenario, e.g. "Cafe Order"
        #[arg(short, long)]
        scenario: String,

        /// Skip the hosted model and use the built-in templates
        #[arg(long)]
        offline: bool,
    },

    /// List supported languages and scenarios
    Scenarios,

    /// Diagnose configuration and credentials
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    match cli.command {
        Commands::Init { force } => commands::init::run(force).await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Generate {
            language,
            scenario,
            offline,
        } => commands::generate::run(language, scenario, offline).await?,
        Commands::Scenarios => commands::scenarios::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
