use std::path::PathBuf;

use tracing::{error, info, warn};

use super::prompt::{build_user_prompt, ReportPrompt, SYSTEM_PROMPT};
use crate::analysis::DocumentRecord;
use crate::config::{ConfigError, GenerativeConfig};
use crate::network::{GenerativeClient, ServiceResult};
use crate::storage;

const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Chat-completion capability used to write the report.
#[async_trait::async_trait]
pub trait GenerateReport: Send + Sync {
    async fn generate(&self, prompt: &ReportPrompt) -> ServiceResult<String>;
}

/// Where a generated report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportMode {
    /// Hand the text back to the caller only.
    Return,
    /// Also write it to this path.
    WriteFile(PathBuf),
}

pub struct ReportSynthesizer {
    generator: Box<dyn GenerateReport>,
    temperature: f32,
}

impl ReportSynthesizer {
    #[must_use]
    pub fn new(generator: Box<dyn GenerateReport>) -> Self {
        Self {
            generator,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Synthesizer backed by the configured deployment, or `None` without an
    /// API key.
    pub fn from_config(config: &GenerativeConfig) -> Result<Option<Self>, ConfigError> {
        let Some(client) = GenerativeClient::from_config(config)? else {
            warn!("Generative service API key not configured");
            return Ok(None);
        };
        Ok(Some(Self::new(Box::new(client)).with_temperature(config.temperature)))
    }

    pub fn prompt(&self, records: &[DocumentRecord]) -> ReportPrompt {
        ReportPrompt {
            system: SYSTEM_PROMPT.to_string(),
            user: build_user_prompt(records),
            temperature: self.temperature,
        }
    }

    /// Generate the cross-quarter report. Failures are logged and yield `None`.
    pub async fn synthesize(&self, records: &[DocumentRecord], mode: &ReportMode) -> Option<String> {
        info!("Generating report from {} quarters", records.len());

        let report = match self.generator.generate(&self.prompt(records)).await {
            Ok(report) => report,
            Err(e) => {
                error!("Failed to generate report: {}", e);
                return None;
            }
        };

        if let ReportMode::WriteFile(path) = mode {
            if let Err(e) = storage::write_report(path, &report) {
                error!("Failed to write report: {}", e);
                return None;
            }
            info!("Report saved to {}", path.display());
        }

        Some(report)
    }
}
