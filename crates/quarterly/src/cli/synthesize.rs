use std::path::PathBuf;

use anyhow::{Context, Result};
use quarterly_core::{PipelineConfig, RecordStore, ReportMode, ReportSynthesizer};

use super::{report_mode, OutputArgs};

pub async fn run(
    mut config: PipelineConfig,
    paths: &[PathBuf],
    output: &OutputArgs,
    stdout: bool,
) -> Result<()> {
    output.apply(&mut config);

    let records = paths
        .iter()
        .map(|path| RecordStore::load(path))
        .collect::<Result<Vec<_>, _>>()
        .context("failed to load records")?;

    let Some(synthesizer) = ReportSynthesizer::from_config(&config.generative)? else {
        eprintln!("FOUNDRY_API_KEY is not set; no report generated");
        return Ok(());
    };

    let mode = report_mode(&config, stdout);
    match (synthesizer.synthesize(&records, &mode).await, &mode) {
        (Some(report), ReportMode::Return) => println!("{report}"),
        (Some(_), ReportMode::WriteFile(path)) => eprintln!("Report: {}", path.display()),
        (None, _) => eprintln!("Report generation failed"),
    }

    Ok(())
}
