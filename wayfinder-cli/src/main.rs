//! Wayfinder CLI - command-line interface
//!
//! Plans routes between free-text endpoints and can replay a simulated
//! drive along the planned geometry, exercising the full engine: geocoding,
//! routing with offline fallback, step synthesis, progress tracking, and
//! voice announcements (logged).

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "wayfinder", about = "Offline-capable turn-by-turn navigation")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// OpenRouteService API key (falls back to $ORS_API_KEY).
    #[arg(long, global = true)]
    api_key: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a route and print its turn-by-turn steps
    Plan {
        /// Start location: place name or "lat,lon"
        start: String,
        /// End location: place name or "lat,lon"
        end: String,
    },
    /// Plan a route, then simulate driving it step by step
    Drive {
        /// Start location: place name or "lat,lon"
        start: String,
        /// End location: place name or "lat,lon"
        end: String,
        /// Milliseconds between simulated position samples
        #[arg(long, default_value_t = 250)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let api_key = cli
        .api_key
        .or_else(|| std::env::var("ORS_API_KEY").ok())
        .unwrap_or_default();

    let result = match cli.command {
        Command::Plan { start, end } => commands::plan(&start, &end, &api_key).await,
        Command::Drive {
            start,
            end,
            interval_ms,
        } => commands::drive(&start, &end, &api_key, interval_ms).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
