//! Azure AI Language REST client.
//!
//! Sentiment and key phrases use the synchronous `:analyze-text` endpoint.
//! Abstractive summarization is a long-running job: it is submitted to
//! `analyze-text/jobs` and its `operation-location` is polled until the job
//! settles or the poll budget runs out.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::client::{base_url, build_http_client, check_status, read_json, ServiceError, ServiceResult};
use crate::analysis::{
    AnalyzeSentimentAndPhrases, ConfidenceScores, SentimentLabel, SentimentScore, Summarize,
    SummaryOutcome,
};
use crate::config::{ConfigError, LanguageConfig};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const DOCUMENT_ID: &str = "1";
const DOCUMENT_LANGUAGE: &str = "en";

#[derive(Clone)]
pub struct LanguageClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    api_version: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl std::fmt::Debug for LanguageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl LanguageClient {
    /// Client for the configured resource, or `None` without credentials.
    pub fn from_config(config: &LanguageConfig) -> Result<Option<Self>, ConfigError> {
        let Some((endpoint, key)) = config.credentials() else {
            return Ok(None);
        };

        let endpoint = base_url(endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;

        Ok(Some(Self {
            http: build_http_client(config.timeout_secs)?,
            endpoint,
            api_key: key.to_string(),
            api_version: config.api_version.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: config.max_polls,
        }))
    }

    fn url(&self, path: &str) -> ServiceResult<Url> {
        let mut url = self.endpoint.join(path)?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    async fn analyze_text<T: for<'de> Deserialize<'de>>(
        &self,
        kind: &'static str,
        text: &str,
    ) -> ServiceResult<T> {
        let request = AnalyzeTextRequest {
            kind,
            analysis_input: AnalysisInput::single(text),
        };

        let resp = self
            .http
            .post(self.url("language/:analyze-text")?)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        read_json(resp).await
    }

    async fn submit_summary_job(&self, text: &str, sentence_count: u32) -> ServiceResult<Url> {
        let request = AnalyzeJobRequest {
            display_name: "Earnings call summary",
            analysis_input: AnalysisInput::single(text),
            tasks: vec![JobTask {
                kind: "AbstractiveSummarization",
                task_name: "summary",
                parameters: SummaryParameters { sentence_count },
            }],
        };

        let resp = self
            .http
            .post(self.url("language/analyze-text/jobs")?)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let location = resp
            .headers()
            .get("operation-location")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ServiceError::Parse("summary job response has no operation-location".into()))?;

        Ok(Url::parse(location)?)
    }

    async fn wait_for_job(&self, location: &Url) -> ServiceResult<JobState> {
        for attempt in 1..=self.max_polls {
            let resp = self
                .http
                .get(location.clone())
                .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
                .send()
                .await?;

            let state: JobState = read_json(resp).await?;
            debug!("Summary job poll {}: {}", attempt, state.status);

            match state.status.as_str() {
                "succeeded" | "partiallySucceeded" | "partiallyCompleted" => return Ok(state),
                "failed" | "cancelled" | "cancelling" => {
                    return Err(ServiceError::JobFailed(state.error_text()));
                }
                _ => tokio::time::sleep(self.poll_interval).await,
            }
        }

        Err(ServiceError::Timeout(self.max_polls))
    }
}

#[async_trait::async_trait]
impl AnalyzeSentimentAndPhrases for LanguageClient {
    async fn analyze_sentiment(&self, text: &str) -> ServiceResult<SentimentScore> {
        let response: AnalyzeTextResponse<SentimentDocument> =
            self.analyze_text("SentimentAnalysis", text).await?;
        sentiment_from_response(response)
    }

    async fn extract_key_phrases(&self, text: &str) -> ServiceResult<Vec<String>> {
        let response: AnalyzeTextResponse<KeyPhraseDocument> =
            self.analyze_text("KeyPhraseExtraction", text).await?;
        Ok(single_document(response.results)?.key_phrases)
    }
}

#[async_trait::async_trait]
impl Summarize for LanguageClient {
    async fn summarize(&self, text: &str, sentence_count: u32) -> ServiceResult<SummaryOutcome> {
        let location = self.submit_summary_job(text, sentence_count).await?;
        info!("Summary job submitted, waiting for completion");
        let state = self.wait_for_job(&location).await?;
        Ok(summary_from_job(state))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeTextRequest<'a> {
    kind: &'static str,
    analysis_input: AnalysisInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeJobRequest<'a> {
    display_name: &'static str,
    analysis_input: AnalysisInput<'a>,
    tasks: Vec<JobTask>,
}

#[derive(Debug, Serialize)]
struct AnalysisInput<'a> {
    documents: Vec<InputDocument<'a>>,
}

impl<'a> AnalysisInput<'a> {
    fn single(text: &'a str) -> Self {
        Self {
            documents: vec![InputDocument {
                id: DOCUMENT_ID,
                language: DOCUMENT_LANGUAGE,
                text,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct InputDocument<'a> {
    id: &'static str,
    language: &'static str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JobTask {
    kind: &'static str,
    task_name: &'static str,
    parameters: SummaryParameters,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryParameters {
    sentence_count: u32,
}

#[derive(Debug, Deserialize)]
struct AnalyzeTextResponse<D> {
    results: DocumentResults<D>,
}

#[derive(Debug, Deserialize)]
struct DocumentResults<D> {
    documents: Vec<D>,
    #[serde(default)]
    errors: Vec<DocumentErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct DocumentErrorEntry {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentimentDocument {
    sentiment: String,
    confidence_scores: ConfidenceScores,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyPhraseDocument {
    key_phrases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JobState {
    status: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
    #[serde(default)]
    tasks: Option<JobTasks>,
}

impl JobState {
    fn error_text(&self) -> String {
        if self.errors.is_empty() {
            return format!("job {}", self.status);
        }
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Deserialize)]
struct JobTasks {
    #[serde(default)]
    items: Vec<JobTaskResult>,
}

#[derive(Debug, Deserialize)]
struct JobTaskResult {
    #[serde(default)]
    results: Option<DocumentResults<SummaryDocument>>,
}

#[derive(Debug, Deserialize)]
struct SummaryDocument {
    summaries: Vec<SummaryText>,
}

#[derive(Debug, Deserialize)]
struct SummaryText {
    text: String,
}

/// The one document the request carried, or its reported error.
fn single_document<D>(results: DocumentResults<D>) -> ServiceResult<D> {
    if let Some(entry) = results.errors.into_iter().next() {
        return Err(ServiceError::Document {
            code: entry.error.code,
            message: entry.error.message,
        });
    }
    results
        .documents
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::Parse("response contains no documents".into()))
}

fn sentiment_from_response(
    response: AnalyzeTextResponse<SentimentDocument>,
) -> ServiceResult<SentimentScore> {
    let document = single_document(response.results)?;
    let label = document
        .sentiment
        .parse::<SentimentLabel>()
        .map_err(ServiceError::Parse)?;

    Ok(SentimentScore {
        label,
        confidence_scores: document.confidence_scores,
    })
}

/// Summary sentences from a settled job. The last successful document wins;
/// a document-level error (or no results at all) means no summary.
fn summary_from_job(state: JobState) -> SummaryOutcome {
    let mut outcome = SummaryOutcome::Unavailable("job returned no summarization results".into());

    let items = state.tasks.map(|t| t.items).unwrap_or_default();
    for results in items.into_iter().filter_map(|item| item.results) {
        if let Some(entry) = results.errors.first() {
            outcome = SummaryOutcome::Unavailable(format!(
                "{}: {}",
                entry.error.code, entry.error.message
            ));
        }
        for document in results.documents {
            outcome = SummaryOutcome::Sentences(
                document.summaries.into_iter().map(|s| s.text).collect(),
            );
        }
    }

    outcome
}
