use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Document-level tone as labelled by the language service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    Mixed,
}

impl SentimentLabel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            "mixed" => Ok(Self::Mixed),
            other => Err(format!("unknown sentiment label: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl ConfidenceScores {
    pub const SUM_TOLERANCE: f64 = 1e-3;

    pub fn total(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }

    /// Every score is in [0, 1] and the three sum to 1 within tolerance.
    pub fn is_consistent(&self) -> bool {
        [self.positive, self.neutral, self.negative]
            .iter()
            .all(|s| (0.0..=1.0).contains(s))
            && (self.total() - 1.0).abs() <= Self::SUM_TOLERANCE
    }
}

impl fmt::Display for ConfidenceScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "positive={:.2}, neutral={:.2}, negative={:.2}",
            self.positive, self.neutral, self.negative
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    #[serde(rename = "sentiment")]
    pub label: SentimentLabel,
    pub confidence_scores: ConfidenceScores,
}

/// Everything the language service says about one transcript.
///
/// Serializes flat: `{sentiment, confidence_scores, key_phrases, summary}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub sentiment: SentimentScore,
    pub key_phrases: Vec<String>,
    pub summary: String,
}

/// One analyzed transcript, the unit persisted to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub filename: String,
    pub results: AnalysisResult,
}

impl DocumentRecord {
    #[must_use]
    pub fn new(filename: impl Into<String>, results: AnalysisResult) -> Self {
        Self {
            filename: filename.into(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentRecord {
        DocumentRecord::new(
            "q1.pdf",
            AnalysisResult {
                sentiment: SentimentScore {
                    label: SentimentLabel::Mixed,
                    confidence_scores: ConfidenceScores {
                        positive: 0.41,
                        neutral: 0.17,
                        negative: 0.42,
                    },
                },
                key_phrases: vec!["crush margins".into(), "biofuel demand".into()],
                summary: "Margins fell.".into(),
            },
        )
    }

    #[test]
    fn test_record_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["filename"], "q1.pdf");
        assert_eq!(value["results"]["sentiment"], "mixed");
        assert_eq!(value["results"]["confidence_scores"]["negative"], 0.42);
        assert_eq!(value["results"]["key_phrases"][1], "biofuel demand");
        assert_eq!(value["results"]["summary"], "Margins fell.");
        assert_eq!(value["results"].as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_record_reads_back() {
        let json = serde_json::to_string(&sample()).unwrap();
        let record: DocumentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, sample());
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("Positive".parse::<SentimentLabel>(), Ok(SentimentLabel::Positive));
        assert_eq!("mixed".parse::<SentimentLabel>(), Ok(SentimentLabel::Mixed));
        assert!("bullish".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn test_confidence_consistency() {
        assert!(sample().results.sentiment.confidence_scores.is_consistent());

        let skewed = ConfidenceScores {
            positive: 0.9,
            neutral: 0.9,
            negative: 0.0,
        };
        assert!(!skewed.is_consistent());
    }
}
