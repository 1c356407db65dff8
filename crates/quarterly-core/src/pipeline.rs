//! Batch orchestration: extract, analyze and persist each transcript in order,
//! then synthesize one report from everything that was persisted.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::analysis::{DocumentAnalyzer, DocumentRecord};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::ingest::{DocumentExtractor, ExtractionError, TextNormalizer};
use crate::report::{ReportMode, ReportSynthesizer};
use crate::storage::RecordStore;

/// Where a document ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentState {
    Pending,
    Extracted,
    Analyzed,
    Persisted,
    Skipped,
    Failed,
}

impl DocumentState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Extracted => "extracted",
            Self::Analyzed => "analyzed",
            Self::Persisted => "persisted",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOutcome {
    /// 1-based position in the input list
    pub index: usize,
    pub path: PathBuf,
    pub state: DocumentState,
    /// Written `transcript_<index>.json`, once persisted
    pub record_path: Option<PathBuf>,
    /// Why the document was skipped or failed
    pub reason: Option<String>,
}

impl DocumentOutcome {
    fn new(index: usize, path: &Path) -> Self {
        Self {
            index,
            path: path.to_path_buf(),
            state: DocumentState::Pending,
            record_path: None,
            reason: None,
        }
    }

    fn settle(&mut self, state: DocumentState, reason: impl Into<String>) {
        self.state = state;
        self.reason = Some(reason.into());
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
    /// Persisted records, in input order
    pub records: Vec<DocumentRecord>,
    /// Generated report text, if synthesis ran and succeeded
    pub report: Option<String>,
    /// Report file, if one was written
    pub report_path: Option<PathBuf>,
}

impl BatchReport {
    fn count(&self, state: DocumentState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }

    pub fn persisted_count(&self) -> usize {
        self.count(DocumentState::Persisted)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(DocumentState::Skipped)
    }

    pub fn failed_count(&self) -> usize {
        self.count(DocumentState::Failed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.state == DocumentState::Failed)
    }
}

pub struct BatchOrchestrator {
    documents: Vec<PathBuf>,
    extractor: DocumentExtractor,
    analyzer: Option<DocumentAnalyzer>,
    synthesizer: Option<ReportSynthesizer>,
    store: RecordStore,
    report_mode: ReportMode,
}

impl BatchOrchestrator {
    /// Orchestrator with the default extractor and no remote services.
    #[must_use]
    pub fn new(documents: Vec<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let store = RecordStore::new(output_dir);
        let report_mode = ReportMode::WriteFile(store.dir().join(crate::config::DEFAULT_REPORT_FILE));
        Self {
            documents,
            extractor: DocumentExtractor::default(),
            analyzer: None,
            synthesizer: None,
            store,
            report_mode,
        }
    }

    /// Wire every component from configuration. Missing credentials leave the
    /// corresponding service unset rather than failing.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let normalizer = TextNormalizer::new(&config.normalizer)?;
        Ok(Self {
            documents: config.documents.clone(),
            extractor: DocumentExtractor::new(normalizer),
            analyzer: DocumentAnalyzer::from_config(&config.language)?,
            synthesizer: ReportSynthesizer::from_config(&config.generative)?,
            store: RecordStore::new(&config.output_dir),
            report_mode: ReportMode::WriteFile(config.report_path()),
        })
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: DocumentExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Option<DocumentAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    #[must_use]
    pub fn with_synthesizer(mut self, synthesizer: Option<ReportSynthesizer>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    #[must_use]
    pub fn with_report_mode(mut self, mode: ReportMode) -> Self {
        self.report_mode = mode;
        self
    }

    /// Process every document in order, then synthesize once.
    ///
    /// Per-document problems never abort the batch; they are recorded in the
    /// returned [`BatchReport`].
    pub async fn run(&self) -> BatchReport {
        let mut batch = BatchReport::default();
        let total = self.documents.len();

        for (i, path) in self.documents.iter().enumerate() {
            let index = i + 1;
            info!("Processing {}/{}: {}", index, total, path.display());

            let (outcome, record) = self.process(index, path).await;
            if let Some(reason) = &outcome.reason {
                match outcome.state {
                    DocumentState::Failed => error!("{}: {}", path.display(), reason),
                    _ => warn!("Skipping {}: {}", path.display(), reason),
                }
            }
            batch.outcomes.push(outcome);
            batch.records.extend(record);
        }

        info!(
            "Batch complete: {} persisted, {} skipped, {} failed",
            batch.persisted_count(),
            batch.skipped_count(),
            batch.failed_count()
        );

        if batch.records.is_empty() {
            return batch;
        }

        if let Some(synthesizer) = &self.synthesizer {
            batch.report = synthesizer.synthesize(&batch.records, &self.report_mode).await;
            if batch.report.is_some() {
                if let ReportMode::WriteFile(path) = &self.report_mode {
                    batch.report_path = Some(path.clone());
                }
            }
        } else {
            warn!("Report synthesis unavailable; skipping report");
        }

        batch
    }

    async fn process(&self, index: usize, path: &Path) -> (DocumentOutcome, Option<DocumentRecord>) {
        let mut outcome = DocumentOutcome::new(index, path);

        match self.advance(index, path, &mut outcome).await {
            Ok(record) => (outcome, record),
            Err(Error::Extraction(ExtractionError::NotFound(_))) => {
                outcome.settle(DocumentState::Skipped, "file not found");
                (outcome, None)
            }
            Err(e) => {
                outcome.settle(DocumentState::Failed, e.to_string());
                (outcome, None)
            }
        }
    }

    /// Move one document as far through the states as it can go.
    async fn advance(
        &self,
        index: usize,
        path: &Path,
        outcome: &mut DocumentOutcome,
    ) -> Result<Option<DocumentRecord>> {
        let text = self.extractor.extract(path).await?;
        outcome.state = DocumentState::Extracted;

        let Some(analyzer) = &self.analyzer else {
            outcome.settle(DocumentState::Skipped, "language service not configured");
            return Ok(None);
        };

        let results = analyzer.analyze(&text).await?;
        outcome.state = DocumentState::Analyzed;
        info!(
            "Sentiment: {} ({})",
            results.sentiment.label, results.sentiment.confidence_scores
        );

        // Path as listed, not just the file name.
        let record = DocumentRecord::new(path.to_string_lossy(), results);
        let saved = self.store.save(index, &record)?;
        info!("Saved {}", saved.display());

        outcome.state = DocumentState::Persisted;
        outcome.record_path = Some(saved);
        Ok(Some(record))
    }
}
