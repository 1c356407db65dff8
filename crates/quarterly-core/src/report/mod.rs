//! Cross-quarter report synthesis.

mod prompt;
mod synthesizer;

pub use prompt::{build_user_prompt, ReportPrompt, MAX_PROMPT_KEY_PHRASES, SYSTEM_PROMPT};
pub use synthesizer::{GenerateReport, ReportMode, ReportSynthesizer};
