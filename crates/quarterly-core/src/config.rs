//! Run configuration.
//!
//! A [`PipelineConfig`] is assembled once at startup (defaults, then an
//! optional TOML file, then environment overrides) and handed to each
//! component. Nothing below this module reads the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default generative endpoint (OpenAI-compatible v1 base URL).
pub const DEFAULT_GENERATIVE_ENDPOINT: &str =
    "https://oliver-shackley-7725-resource.openai.azure.com/openai/v1/";

/// Default generative deployment.
pub const DEFAULT_GENERATIVE_MODEL: &str = "Kimi-K2-Thinking";

/// Default Markdown report file name.
pub const DEFAULT_REPORT_FILE: &str = "earnings_analysis.md";

/// Boilerplate emitted on every page of S&P Global transcripts.
///
/// Words may be separated by any whitespace, including line breaks, since PDF
/// text often wraps the footer. Each match ends at the end of its last line.
pub const DEFAULT_FOOTER_PATTERNS: &[&str] = &[
    r"Copyright\s+©\s+\d{4}\s+S&P\s+Global\s+Market\s+Intelligence[^\n]*",
    r"spglobal\.com/marketintelligence[^\n]*",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid footer pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("Invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Text normalizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Footer/copyright patterns, matched case-insensitively up to end of line.
    #[serde(default = "default_footer_patterns")]
    pub footer_patterns: Vec<String>,
}

fn default_footer_patterns() -> Vec<String> {
    DEFAULT_FOOTER_PATTERNS.iter().map(|p| (*p).to_string()).collect()
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            footer_patterns: default_footer_patterns(),
        }
    }
}

/// Language service (sentiment, key phrases, summarization) settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Resource endpoint, e.g. `https://<name>.cognitiveservices.azure.com/`
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Subscription key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Delay between summary job status polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Polls before a summary job is abandoned
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
    #[serde(default = "default_language_timeout")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    "2023-04-01".to_string()
}

const fn default_poll_interval_ms() -> u64 {
    2000
}

const fn default_max_polls() -> u32 {
    150
}

const fn default_language_timeout() -> u64 {
    120
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            api_version: default_api_version(),
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
            timeout_secs: default_language_timeout(),
        }
    }
}

impl LanguageConfig {
    /// Endpoint and key, if both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let endpoint = self.endpoint.as_deref().filter(|s| !s.trim().is_empty())?;
        let key = self.api_key.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((endpoint, key))
    }
}

/// Generative (chat-completion) service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerativeConfig {
    #[serde(default = "default_generative_endpoint")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Deployment or model identifier
    #[serde(default = "default_generative_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_generative_timeout")]
    pub timeout_secs: u64,
}

fn default_generative_endpoint() -> String {
    DEFAULT_GENERATIVE_ENDPOINT.to_string()
}

fn default_generative_model() -> String {
    DEFAULT_GENERATIVE_MODEL.to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

// Reasoning deployments can take several minutes on a four-quarter prompt.
const fn default_generative_timeout() -> u64 {
    600
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_generative_endpoint(),
            api_key: None,
            model: default_generative_model(),
            temperature: default_temperature(),
            timeout_secs: default_generative_timeout(),
        }
    }
}

impl GenerativeConfig {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Everything one batch run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Transcripts in quarter order
    #[serde(default)]
    pub documents: Vec<PathBuf>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_report_file")]
    pub report_file: String,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub language: LanguageConfig,
    #[serde(default)]
    pub generative: GenerativeConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_report_file() -> String {
    DEFAULT_REPORT_FILE.to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            output_dir: default_output_dir(),
            report_file: default_report_file(),
            normalizer: NormalizerConfig::default(),
            language: LanguageConfig::default(),
            generative: GenerativeConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML config file. Relative document paths stay relative to the
    /// working directory, not the file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply overrides from the process environment.
    ///
    /// Supported variables:
    /// - `AZURE_LANGUAGE_ENDPOINT`, `AZURE_LANGUAGE_KEY`
    /// - `FOUNDRY_API_KEY`, `FOUNDRY_ENDPOINT`, `FOUNDRY_MODEL`
    /// - `QUARTERLY_OUTPUT_DIR`
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup("AZURE_LANGUAGE_ENDPOINT") {
            self.language.endpoint = Some(val);
        }
        if let Some(val) = lookup("AZURE_LANGUAGE_KEY") {
            self.language.api_key = Some(val);
        }
        if let Some(val) = lookup("FOUNDRY_API_KEY") {
            self.generative.api_key = Some(val);
        }
        if let Some(val) = lookup("FOUNDRY_ENDPOINT") {
            self.generative.endpoint = val;
        }
        if let Some(val) = lookup("FOUNDRY_MODEL") {
            self.generative.model = val;
        }
        if let Some(val) = lookup("QUARTERLY_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(val);
        }
        self
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }
}
