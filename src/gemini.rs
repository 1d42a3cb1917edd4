//! Client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use log::{debug, error, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;
use crate::error::{BotError, Result};
use crate::types::{Role, Turn};

pub const TEMPERATURE: f32 = 0.7;

// 500 tokens is roughly 2000 characters, one Discord message.
pub const MAX_OUTPUT_TOKENS: u32 = 500;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const EMPTY_RESPONSE_MESSAGE: &str = "Sorry, I couldn't generate a response.";

pub const APOLOGY_MESSAGE: &str = "⚠️ Sorry, I encountered an error. Please try again later.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: Role,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Classified outcome of a generation call that reached the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// First candidate's text, untouched.
    Text(String),
    /// Success status but no candidates.
    Empty,
    /// Non-success status with the raw response body.
    Upstream { status: StatusCode, body: String },
}

impl Generation {
    /// Text shown to the user for this outcome.
    ///
    /// Upstream errors are relayed with their status and raw body.
    pub fn into_reply(self) -> String {
        match self {
            Generation::Text(text) => text,
            Generation::Empty => EMPTY_RESPONSE_MESSAGE.to_string(),
            Generation::Upstream { status, body } => {
                format!("⚠️ API Error (Status: {}): {}", status.as_u16(), body)
            }
        }
    }
}

pub struct GeminiClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    endpoint: Url,
    timeout: Duration,
}

impl GeminiClient {
    /// `endpoint` is the base URL that model names are appended to.
    pub fn new(api_key: String, model: String, endpoint: Url) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model,
            endpoint,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_api_base.clone(),
        )
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.endpoint.as_str().trim_end_matches('/'),
            self.model
        )
    }

    /// Generates a reply and always yields displayable text.
    ///
    /// Transport and decode failures are logged and replaced with
    /// [`APOLOGY_MESSAGE`].
    pub async fn generate(&self, prompt: &str, history: &[Turn]) -> String {
        match self.request(prompt, history).await {
            Ok(generation) => generation.into_reply(),
            Err(e) => {
                error!("Gemini request failed: {e}");
                APOLOGY_MESSAGE.to_string()
            }
        }
    }

    /// Sends one `generateContent` call and classifies the response.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Reqwest`] on transport failure or timeout and
    /// [`BotError::GeminiResponse`] when a success body cannot be decoded.
    pub async fn request(&self, prompt: &str, history: &[Turn]) -> Result<Generation> {
        debug!(
            "Sending request to Gemini model {} with {} history turns (last: {})",
            self.model,
            history.len(),
            history.last().map_or("none", |turn| turn.role.into())
        );

        let request = build_request(prompt, history);

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            warn!("Gemini API error ({status}): {body}");
            return Ok(Generation::Upstream { status, body });
        }

        let api_response: GenerateContentResponse = response.json().await?;

        let Some(candidate) = api_response.candidates.into_iter().next() else {
            debug!("Gemini returned no candidates");
            return Ok(Generation::Empty);
        };

        let text = candidate
            .content
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| {
                BotError::GeminiResponse("first candidate has no text part".to_string())
            })?;

        debug!("Received response from Gemini API");
        Ok(Generation::Text(text))
    }
}

fn build_request(prompt: &str, history: &[Turn]) -> GenerateContentRequest {
    let contents = history
        .iter()
        .map(|turn| Content {
            role: turn.role,
            parts: vec![Part {
                text: turn.text.clone(),
            }],
        })
        .chain(std::iter::once(Content {
            role: Role::User,
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }))
        .collect();

    GenerateContentRequest {
        contents,
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
    }
}
