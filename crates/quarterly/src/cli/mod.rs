pub mod extract;
pub mod run;
pub mod synthesize;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use quarterly_core::{PipelineConfig, ReportMode};

#[derive(Parser)]
#[command(
    name = "quarterly",
    about = "Cross-quarter sentiment reports from earnings-call transcripts",
    version
)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long, global = true, env = "QUARTERLY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze transcripts in quarter order and write the report
    Run {
        /// Transcript files (PDF or text), oldest quarter first
        documents: Vec<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
        /// Print the report instead of writing it
        #[arg(long)]
        stdout: bool,
    },
    /// Print the normalized text of one transcript
    Extract {
        /// Transcript file
        file: PathBuf,
    },
    /// Rebuild the report from saved transcript_<n>.json records
    Synthesize {
        /// Record files, oldest quarter first
        #[arg(required = true)]
        records: Vec<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
        /// Print the report instead of writing it
        #[arg(long)]
        stdout: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Directory for records and the report
    #[arg(short, long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Report file name inside the output directory
    #[arg(long = "report-file")]
    pub report_file: Option<String>,
}

impl OutputArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if let Some(name) = &self.report_file {
            config.report_file.clone_from(name);
        }
    }
}

/// Defaults, then the config file, then environment variables.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn report_mode(config: &PipelineConfig, stdout: bool) -> ReportMode {
    if stdout {
        ReportMode::Return
    } else {
        ReportMode::WriteFile(config.report_path())
    }
}
