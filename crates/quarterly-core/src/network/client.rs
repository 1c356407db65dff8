use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },
    #[error("Unexpected response: {0}")]
    Parse(String),
    #[error("Document error {code}: {message}")]
    Document { code: String, message: String },
    #[error("Job failed: {0}")]
    JobFailed(String),
    #[error("Job still running after {0} polls")]
    Timeout(u32),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("quarterly/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Parse a base URL so that relative joins append to it instead of
/// replacing its last segment.
pub(crate) fn base_url(endpoint: &str) -> Result<Url, url::ParseError> {
    let trimmed = endpoint.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

/// Fail on non-2xx, otherwise decode the JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response) -> ServiceResult<T> {
    let resp = check_status(resp).await?;
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| ServiceError::Parse(e.to_string()))
}

pub(crate) async fn check_status(resp: Response) -> ServiceResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ServiceError::Api {
        status: status.as_u16(),
        body,
    })
}
