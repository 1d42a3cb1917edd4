//! Group conversation analysis: neutral summary plus a suggestion.

use crate::gemini::GeminiClient;
use crate::history::GROUP_LOG_CAP;

const PREAMBLE: &str = "You are an unbiased, emotionally intelligent AI mediator. \
Given these group messages, provide:\n\
1. A short, neutral summary\n\
2. An unbiased suggestion\n\
Format strictly as:\n\
Summary: <summary>\n\
Suggestion: <suggestion>\n\
Messages:\n";

/// Builds the single-shot analysis prompt over the most recent lines.
pub fn build_analysis_prompt(lines: &[String]) -> String {
    let start = lines.len().saturating_sub(GROUP_LOG_CAP);
    format!("{PREAMBLE}{}", lines[start..].join("\n"))
}

/// Asks the model to mediate; no conversation history is sent.
pub async fn analyze_conversation(client: &GeminiClient, lines: &[String]) -> String {
    client.generate(&build_analysis_prompt(lines), &[]).await
}
