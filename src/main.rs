use clap::{Parser, Subcommand};
use photo_triage::{commands, error::Result, ReviewConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "photo-triage",
    version,
    about = "Classifies photos as memorable or forgettable and drives the cleanup in Google Photos"
)]
struct Cli {
    /// Path to a JSON config file; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the photo currently on display, without acting on it
    Classify,
    /// Review photos sequentially: delete forgettable, advance past memorable
    Review {
        /// How many photos to process
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
    /// Download the classifier model if it is not already on disk
    FetchModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("photo_triage=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ReviewConfig::load(path)?,
        None => ReviewConfig::default(),
    };

    match cli.command {
        Commands::Classify => commands::classify::execute(&config).await,
        Commands::Review { count } => commands::review::execute(&config, count).await,
        Commands::FetchModel => commands::model::execute(&config).await,
    }
}
