//! quarterly - cross-quarter earnings-call analysis.
//!
//! Extracts earnings-call transcripts, scores them with a language service,
//! and asks a chat model for a trend report across quarters.

mod cli;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quarterly=info,quarterly_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            documents,
            output,
            stdout,
        } => cli::run::run(config, documents, &output, stdout).await,
        Commands::Extract { file } => cli::extract::run(&config, &file).await,
        Commands::Synthesize {
            records,
            output,
            stdout,
        } => cli::synthesize::run(config, &records, &output, stdout).await,
    }
}
