use regex::{Regex, RegexBuilder};

use crate::config::{ConfigError, NormalizerConfig};

/// Removes transcript boilerplate and collapses whitespace.
///
/// Footer patterns are compiled case-insensitive with `.` stopping at line
/// ends, so each match consumes the rest of its line only.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    footers: Vec<Regex>,
    page_number: Regex,
    whitespace: Regex,
}

impl TextNormalizer {
    pub fn new(config: &NormalizerConfig) -> Result<Self, ConfigError> {
        let footers = config
            .footer_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            footers,
            page_number: Regex::new(r"(?m)^[ \t]*\d+[ \t]*\r?$").expect("static regex"),
            whitespace: Regex::new(r"\s+").expect("static regex"),
        })
    }

    /// Normalizer with only the built-in S&P Global footer patterns.
    pub fn with_default_patterns() -> Self {
        Self::new(&NormalizerConfig::default()).expect("default footer patterns compile")
    }

    pub fn normalize(&self, raw: &str) -> String {
        let mut text = raw.to_string();

        for footer in &self.footers {
            text = footer.replace_all(&text, "").into_owned();
        }

        let text = self.page_number.replace_all(&text, "");
        self.whitespace.replace_all(&text, " ").trim().to_string()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::with_default_patterns()
    }
}
