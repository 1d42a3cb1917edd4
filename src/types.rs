//! Common types used throughout the mediator bot.

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Role of a turn in a private conversation.
///
/// Serializes to the Gemini `contents[].role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Message from the human user
    User,
    /// Message produced by the model
    Model,
}

/// One role-tagged message in a private conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_match_wire_format() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(<&'static str>::from(Role::Model), "model");
        assert_eq!(
            serde_json::to_value(Role::Model).expect("serializable"),
            serde_json::json!("model")
        );
    }
}
