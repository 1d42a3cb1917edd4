use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Serenity error: {0}")]
    Serenity(Box<poise::serenity_prelude::Error>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Gemini response error: {0}")]
    GeminiResponse(String),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Message has no text content")]
    EmptyMessage,
}

impl From<poise::serenity_prelude::Error> for BotError {
    fn from(err: poise::serenity_prelude::Error) -> Self {
        BotError::Serenity(Box::new(err))
    }
}

impl BotError {
    /// Returns a user-friendly error message suitable for displaying in Discord
    pub fn user_message(&self) -> String {
        match self {
            BotError::Serenity(_) => {
                "Sorry, I'm having trouble communicating with Discord right now. Please try again later.".to_string()
            }
            BotError::Config(_) => {
                "Sorry, there's a configuration issue on my end. Please contact the bot administrator.".to_string()
            }
            BotError::GeminiResponse(_) => {
                "Sorry, I received an unexpected response from my AI service. Please try again.".to_string()
            }
            BotError::Reqwest(e) if e.is_timeout() => {
                "Sorry, my AI service took too long to answer. Please try again in a moment.".to_string()
            }
            BotError::Reqwest(_) => {
                "Sorry, I'm having network issues. Please try again in a moment.".to_string()
            }
            BotError::EmptyMessage => {
                "Sorry, I can only read text messages.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_hide_details_from_users() {
        let err = BotError::Config("missing DISCORD_TOKEN".to_string());
        assert!(err.to_string().contains("DISCORD_TOKEN"));
        assert!(!err.user_message().contains("DISCORD_TOKEN"));
    }

    #[test]
    fn empty_message_has_its_own_user_message() {
        assert_eq!(
            BotError::EmptyMessage.user_message(),
            "Sorry, I can only read text messages."
        );
    }
}
