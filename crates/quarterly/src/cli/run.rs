use std::path::PathBuf;

use anyhow::Result;
use quarterly_core::{BatchOrchestrator, BatchReport, DocumentState, PipelineConfig};

use super::{report_mode, OutputArgs};

pub async fn run(
    mut config: PipelineConfig,
    documents: Vec<PathBuf>,
    output: &OutputArgs,
    stdout: bool,
) -> Result<()> {
    output.apply(&mut config);
    if !documents.is_empty() {
        config.documents = documents;
    }
    if config.documents.is_empty() {
        eprintln!("No documents to process");
        return Ok(());
    }

    let orchestrator =
        BatchOrchestrator::from_config(&config)?.with_report_mode(report_mode(&config, stdout));
    let batch = orchestrator.run().await;

    print_outcomes(&batch);

    match (&batch.report, &batch.report_path) {
        (Some(report), None) if stdout => println!("{report}"),
        (Some(_), Some(path)) => eprintln!("Report: {}", path.display()),
        _ => {}
    }

    Ok(())
}

fn print_outcomes(batch: &BatchReport) {
    let mut records = batch.records.iter();

    for outcome in &batch.outcomes {
        let path = outcome.path.display();
        match outcome.state {
            DocumentState::Persisted => {
                let saved = outcome
                    .record_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                eprintln!("[{}] {} -> {}", outcome.index, path, saved);
                if let Some(record) = records.next() {
                    let sentiment = &record.results.sentiment;
                    eprintln!(
                        "  Sentiment: {} ({})",
                        sentiment.label, sentiment.confidence_scores
                    );
                }
            }
            state => eprintln!(
                "[{}] {}: {} ({})",
                outcome.index,
                path,
                state,
                outcome.reason.as_deref().unwrap_or("no reason given")
            ),
        }
    }

    eprintln!(
        "{} persisted, {} skipped, {} failed",
        batch.persisted_count(),
        batch.skipped_count(),
        batch.failed_count()
    );
}
