use super::types::SentimentScore;
use crate::network::ServiceResult;

/// Document-level sentiment and key-phrase extraction.
#[async_trait::async_trait]
pub trait AnalyzeSentimentAndPhrases: Send + Sync {
    async fn analyze_sentiment(&self, text: &str) -> ServiceResult<SentimentScore>;

    /// Phrases in the order the service returns them.
    async fn extract_key_phrases(&self, text: &str) -> ServiceResult<Vec<String>>;
}

/// What an abstractive summary request produced for the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Sentences(Vec<String>),
    /// The job finished but reported an error for this document.
    Unavailable(String),
}

/// Abstractive summarization. Implementations wait for any long-running
/// remote job before returning.
#[async_trait::async_trait]
pub trait Summarize: Send + Sync {
    async fn summarize(&self, text: &str, sentence_count: u32) -> ServiceResult<SummaryOutcome>;
}
