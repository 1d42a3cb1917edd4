use std::env;

use log::{debug, error, info};
use url::Url;

use crate::error::{BotError, Result};

pub const DEFAULT_BOT_HANDLE: &str = "genz_mediator_bot";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: Url,
    /// Lower-cased, without the leading `@`.
    pub bot_handle: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Fails when a required credential is missing or empty, or when the API
    /// base is not a valid URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = required(&lookup, "DISCORD_TOKEN")?;
        let gemini_api_key = required(&lookup, "GEMINI_API_KEY")?;

        let gemini_model = optional(&lookup, "GEMINI_MODEL")
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let raw_base = optional(&lookup, "GEMINI_API_BASE")
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());
        let gemini_api_base = Url::parse(&raw_base).map_err(|e| {
            error!("Invalid GEMINI_API_BASE '{raw_base}': {e}");
            BotError::Config(format!("invalid GEMINI_API_BASE: {e}"))
        })?;

        let bot_handle = optional(&lookup, "BOT_USERNAME")
            .map_or_else(|| DEFAULT_BOT_HANDLE.to_string(), |h| normalize_handle(&h));

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!("Gemini API key length: {} characters", gemini_api_key.len());
        debug!("Gemini model: {gemini_model}");
        debug!("Gemini API base: {gemini_api_base}");
        debug!("Bot handle: @{bot_handle}");

        Ok(Self {
            discord_token,
            gemini_api_key,
            gemini_model,
            gemini_api_base,
            bot_handle,
        })
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or_else(|| {
        error!("Missing {name} in environment");
        BotError::Config(format!("missing {name}"))
    })
}

fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn normalize_handle(handle: &str) -> String {
    handle.trim_start_matches('@').to_lowercase()
}
