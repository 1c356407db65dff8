//! OpenAI-compatible chat-completion client (Azure AI Foundry, OpenAI, etc.).

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::client::{base_url, build_http_client, read_json, ServiceError, ServiceResult};
use crate::config::{ConfigError, GenerativeConfig};
use crate::report::{GenerateReport, ReportPrompt};

#[derive(Clone)]
pub struct GenerativeClient {
    http: Client,
    completions_url: Url,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for GenerativeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerativeClient")
            .field("completions_url", &self.completions_url.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GenerativeClient {
    /// Client for the configured deployment, or `None` without an API key.
    pub fn from_config(config: &GenerativeConfig) -> Result<Option<Self>, ConfigError> {
        let Some(api_key) = config.api_key() else {
            return Ok(None);
        };

        let invalid = |source: url::ParseError| ConfigError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
            source,
        };
        let completions_url = base_url(&config.endpoint)
            .and_then(|base| base.join("chat/completions"))
            .map_err(invalid)?;

        Ok(Some(Self {
            http: build_http_client(config.timeout_secs)?,
            completions_url,
            api_key: api_key.to_string(),
            model: config.model.clone(),
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl GenerateReport for GenerativeClient {
    async fn generate(&self, prompt: &ReportPrompt) -> ServiceResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: prompt.temperature,
        };

        debug!("Requesting completion from {} ({})", self.completions_url, self.model);
        let resp = self
            .http
            .post(self.completions_url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let response: ChatResponse = read_json(resp).await?;
        completion_text(response)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn completion_text(response: ChatResponse) -> ServiceResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ServiceError::Parse("completion has no content".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(api_key: Option<&str>) -> GenerativeConfig {
        GenerativeConfig {
            api_key: api_key.map(String::from),
            ..GenerativeConfig::default()
        }
    }

    #[test]
    fn test_from_config_requires_key() {
        assert!(GenerativeClient::from_config(&config(None)).unwrap().is_none());
        assert!(GenerativeClient::from_config(&config(Some(""))).unwrap().is_none());
    }

    #[test]
    fn test_completions_url() {
        let mut config = config(Some("sk-test-secret"));
        config.endpoint = "https://example.openai.azure.com/openai/v1/".into();

        let client = GenerativeClient::from_config(&config).unwrap().unwrap();

        assert_eq!(
            client.completions_url.as_str(),
            "https://example.openai.azure.com/openai/v1/chat/completions"
        );
        assert_eq!(client.model(), "Kimi-K2-Thinking");
        assert!(!format!("{client:?}").contains("sk-test-secret"));
    }

    #[test]
    fn test_request_body() {
        let request = ChatRequest {
            model: "Kimi-K2-Thinking",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "be brief",
                },
                ChatMessage {
                    role: "user",
                    content: "data",
                },
            ],
            temperature: 0.7,
        };

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "Kimi-K2-Thinking");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "data");
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_completion_text() {
        let response: ChatResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "# Report"}, "finish_reason": "stop"}]
        }))
        .unwrap();

        assert_eq!(completion_text(response).unwrap(), "# Report");
    }

    #[test]
    fn test_completion_without_content() {
        let empty: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        let null: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();

        assert!(matches!(completion_text(empty), Err(ServiceError::Parse(_))));
        assert!(matches!(completion_text(null), Err(ServiceError::Parse(_))));
    }
}
