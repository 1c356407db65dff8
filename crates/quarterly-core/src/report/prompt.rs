use crate::analysis::DocumentRecord;

/// Key phrases listed per quarter.
pub const MAX_PROMPT_KEY_PHRASES: usize = 10;

pub const SYSTEM_PROMPT: &str = "You are an AI Assistant that performs scrupulous analysis of earnings call transcripts to \
determine investor sentiment and investment risks in the target company. \
Focus analysis on Risk Factors, Management Tone, and Forward Guidance. \
Generate a Markdown report with a sentiment trend chart (formatted as a standard Markdown Table, NOT ASCII art), \
sentiment scores (0-100), key themes across quarters, investment recommendation, \
and a final sentiment over time visualization (also as a Markdown Table). \
Ensure no lines of text or charts are excessively long to prevent layout overflow. \
Use clear, concise language (2000 most common English words).";

/// One chat request: instruction, data, sampling temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPrompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// Quarter-by-quarter data block, records in input order.
pub fn build_user_prompt(records: &[DocumentRecord]) -> String {
    let mut out = format!(
        "Last {} quarters of earnings calls data:\n\n",
        records.len()
    );

    for (i, record) in records.iter().enumerate() {
        let results = &record.results;
        let phrases: Vec<&str> = results
            .key_phrases
            .iter()
            .take(MAX_PROMPT_KEY_PHRASES)
            .map(String::as_str)
            .collect();

        out.push_str(&format!(
            "--- QUARTER {} ---\nSummary: {}\nSentiment: {} (Scores: {})\nKey Phrases: {}\n\n",
            i + 1,
            results.summary,
            results.sentiment.label,
            results.sentiment.confidence_scores,
            phrases.join(", ")
        ));
    }

    out
}
