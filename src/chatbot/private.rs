//! One-on-one chat sessions in direct messages.

use log::{debug, error, info};
use poise::serenity_prelude::{Context, Message as SerenityMessage};

use crate::bot::Data;
use crate::error::{BotError, Result};
use crate::gemini::GeminiClient;
use crate::history::ConversationHistory;

use super::response::send_reply;

const PRIVATE_ERROR_MESSAGE: &str = "⚠️ An error occurred. Please try again.";

/// Runs one exchange against the session history and records it.
///
/// Whatever text the user is shown becomes the model turn, apologies and
/// upstream errors included, so turns stay paired.
pub async fn exchange(
    client: &GeminiClient,
    history: &mut ConversationHistory,
    text: &str,
) -> String {
    let response = client.generate(text, history.turns()).await;
    history.record_exchange(text, response.as_str());
    debug!("Conversation history now has {} turns", history.len());
    response
}

/// What happened to a direct message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivateOutcome {
    /// No `/chat` session is active for the author.
    Ignored,
    /// The exchange ran; the text is the reply to send.
    Replied(String),
}

/// Applies one direct message to the author's session slot.
///
/// # Errors
///
/// Returns [`BotError::EmptyMessage`] for a message without text during an
/// active session. The session is left untouched in that case.
pub async fn respond_in_session(
    client: &GeminiClient,
    session: &mut Option<ConversationHistory>,
    text: &str,
) -> Result<PrivateOutcome> {
    let Some(history) = session.as_mut() else {
        return Ok(PrivateOutcome::Ignored);
    };

    if text.trim().is_empty() {
        return Err(BotError::EmptyMessage);
    }

    Ok(PrivateOutcome::Replied(exchange(client, history, text).await))
}

/// Handle a direct message from a user with an active `/chat` session.
///
/// Failures are logged and answered; nothing propagates to the caller.
pub async fn handle_private_message(ctx: &Context, new_message: &SerenityMessage, data: &Data) {
    if let Err(e) = process_private_message(ctx, new_message, data).await {
        error!(
            "Error processing private message from {}: {}",
            new_message.author.tag(),
            e
        );
        if let Err(e) = new_message
            .channel_id
            .say(&ctx.http, PRIVATE_ERROR_MESSAGE)
            .await
        {
            error!("Failed to send error reply: {e}");
        }
    }
}

async fn process_private_message(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
) -> Result<()> {
    let Some(mut session) = data
        .conversations()
        .lock_active(&new_message.author.id)
        .await
    else {
        debug!(
            "Ignoring direct message from {} without an active chat",
            new_message.author.tag()
        );
        return Ok(());
    };

    info!(
        "Received direct message from {}: {}",
        new_message.author.tag(),
        new_message.content
    );

    if !new_message.content.trim().is_empty()
        && let Err(e) = new_message.channel_id.broadcast_typing(&ctx.http).await
    {
        debug!("Failed to broadcast typing indicator: {e}");
    }

    let outcome =
        respond_in_session(data.gemini_client(), &mut session, &new_message.content).await?;
    drop(session);

    match outcome {
        PrivateOutcome::Replied(response) => send_reply(ctx, new_message, &response, false).await,
        PrivateOutcome::Ignored => Ok(()),
    }
}
