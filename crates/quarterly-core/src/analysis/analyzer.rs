use tracing::{debug, info, warn};

use super::service::{AnalyzeSentimentAndPhrases, Summarize, SummaryOutcome};
use super::types::AnalysisResult;
use crate::config::{ConfigError, LanguageConfig};
use crate::network::{LanguageClient, ServiceResult};

/// Characters accepted by the sentiment and key-phrase endpoints.
pub const SENTIMENT_CHAR_LIMIT: usize = 5000;

/// Sentences requested from abstractive summarization.
pub const SUMMARY_SENTENCES: u32 = 5;

pub const SUMMARY_PLACEHOLDER: &str = "Summary not available.";

/// Runs sentiment, key-phrase, and summary analysis for one transcript.
pub struct DocumentAnalyzer {
    phrases: Box<dyn AnalyzeSentimentAndPhrases>,
    summarizer: Box<dyn Summarize>,
}

impl DocumentAnalyzer {
    #[must_use]
    pub fn new(phrases: Box<dyn AnalyzeSentimentAndPhrases>, summarizer: Box<dyn Summarize>) -> Self {
        Self { phrases, summarizer }
    }

    /// Analyzer backed by the language service, or `None` when the endpoint or
    /// key is missing.
    pub fn from_config(config: &LanguageConfig) -> Result<Option<Self>, ConfigError> {
        let Some(client) = LanguageClient::from_config(config)? else {
            warn!("Language service credentials not configured");
            return Ok(None);
        };
        Ok(Some(Self::new(Box::new(client.clone()), Box::new(client))))
    }

    pub async fn analyze(&self, text: &str) -> ServiceResult<AnalysisResult> {
        info!("Analyzing document ({} chars)", text.chars().count());

        let short_text = truncate_chars(text, SENTIMENT_CHAR_LIMIT);

        let sentiment = self.phrases.analyze_sentiment(short_text).await?;
        debug!("Sentiment: {} ({})", sentiment.label, sentiment.confidence_scores);

        let key_phrases = self.phrases.extract_key_phrases(short_text).await?;
        debug!("Extracted {} key phrases", key_phrases.len());

        let summary = match self.summarizer.summarize(text, SUMMARY_SENTENCES).await? {
            SummaryOutcome::Sentences(sentences) => sentences.join(" "),
            SummaryOutcome::Unavailable(reason) => {
                warn!("Summary unavailable: {}", reason);
                SUMMARY_PLACEHOLDER.to_string()
            }
        };

        Ok(AnalysisResult {
            sentiment,
            key_phrases,
            summary,
        })
    }
}

/// First `max_chars` characters of `text` (not bytes).
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(end, _)| &text[..end])
}
