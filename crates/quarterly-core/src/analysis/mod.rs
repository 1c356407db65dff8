//! Per-document sentiment, key-phrase, and summary analysis.

mod analyzer;
mod service;
mod types;

pub use analyzer::{DocumentAnalyzer, SENTIMENT_CHAR_LIMIT, SUMMARY_PLACEHOLDER, SUMMARY_SENTENCES};
pub use service::{AnalyzeSentimentAndPhrases, Summarize, SummaryOutcome};
pub use types::{AnalysisResult, ConfidenceScores, DocumentRecord, SentimentLabel, SentimentScore};
