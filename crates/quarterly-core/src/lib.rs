pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod network;
pub mod pipeline;
pub mod report;
pub mod storage;

pub use analysis::{
    AnalysisResult, AnalyzeSentimentAndPhrases, ConfidenceScores, DocumentAnalyzer,
    DocumentRecord, SentimentLabel, SentimentScore, Summarize, SummaryOutcome,
};
pub use config::{ConfigError, GenerativeConfig, LanguageConfig, NormalizerConfig, PipelineConfig};
pub use error::{Error, Result};
pub use ingest::{
    DocumentExtractor, ExtractionError, FilePageSource, PageSource, RawDocument, TextNormalizer,
};
pub use network::{GenerativeClient, LanguageClient, ServiceError, ServiceResult};
pub use pipeline::{BatchOrchestrator, BatchReport, DocumentOutcome, DocumentState};
pub use report::{GenerateReport, ReportMode, ReportSynthesizer};
pub use storage::{RecordStore, StorageError};
