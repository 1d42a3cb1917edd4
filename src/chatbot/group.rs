//! Group channel buffering and mediation on mention.

use log::{debug, error, info};
use poise::serenity_prelude::{Context, Message as SerenityMessage, User, UserId};

use crate::bot::Data;
use crate::error::Result;
use crate::gemini::GeminiClient;
use crate::history::GroupMessageLog;
use crate::mediator::analyze_conversation;

use super::response::send_reply;

const GROUP_ERROR_MESSAGE: &str = "⚠️ Error processing request.";

/// Case-insensitive check for `@<handle>` anywhere in `text`.
pub fn mentions_handle(text: &str, handle: &str) -> bool {
    !handle.is_empty() && text.to_lowercase().contains(&format!("@{}", handle.to_lowercase()))
}

/// Buffers one group line and, when the bot is addressed, mediates.
///
/// The bot's own analysis is buffered as a line from `bot_name`.
pub async fn record_and_analyze(
    client: &GeminiClient,
    log: &mut GroupMessageLog,
    sender: &str,
    text: &str,
    mentioned: bool,
    bot_name: &str,
) -> Option<String> {
    log.push_message(sender, text);
    if !mentioned {
        return None;
    }

    let analysis = analyze_conversation(client, log.lines()).await;
    log.push_message(bot_name, &analysis);
    Some(analysis)
}

/// Name shown for `user` in the group log: global name, else username.
pub fn display_name(user: &User) -> &str {
    user.global_name.as_ref().unwrap_or(&user.name)
}

/// Handle a text message posted in a guild channel.
///
/// Failures are logged and answered; nothing propagates to the caller.
pub async fn handle_group_message(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
    bot_user_id: UserId,
    bot_name: &str,
) {
    if let Err(e) = process_group_message(ctx, new_message, data, bot_user_id, bot_name).await {
        error!(
            "Error processing group message from {} in channel {}: {}",
            new_message.author.tag(),
            new_message.channel_id,
            e
        );
        if let Err(e) = new_message.reply(&ctx.http, GROUP_ERROR_MESSAGE).await {
            error!("Failed to send error reply: {e}");
        }
    }
}

async fn process_group_message(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
    bot_user_id: UserId,
    bot_name: &str,
) -> Result<()> {
    if new_message.content.trim().is_empty() {
        return Ok(());
    }

    let mentioned = new_message.mentions_user_id(bot_user_id)
        || mentions_handle(&new_message.content, data.bot_handle());

    let mut slot = data.group_logs().lock(&new_message.channel_id).await;
    let log = slot.get_or_insert_with(GroupMessageLog::new);

    if mentioned {
        info!(
            "Mentioned by {} in channel {}: {}",
            new_message.author.tag(),
            new_message.channel_id,
            new_message.content
        );
        if let Err(e) = new_message.channel_id.broadcast_typing(&ctx.http).await {
            debug!("Failed to broadcast typing indicator: {e}");
        }
    }

    let analysis = record_and_analyze(
        data.gemini_client(),
        log,
        display_name(&new_message.author),
        &new_message.content,
        mentioned,
        bot_name,
    )
    .await;
    debug!(
        "Channel {} log has {} lines",
        new_message.channel_id,
        log.len()
    );
    drop(slot);

    match analysis {
        Some(text) => send_reply(ctx, new_message, &text, true).await,
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use url::Url;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const ANALYSIS: &str = "Summary: they disagree\nSuggestion: take a break";

    async fn mediating_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": ANALYSIS }] } }]
            })))
            .mount(&server)
            .await;
        server
    }

    fn client_for(server: &MockServer) -> GeminiClient {
        let base = Url::parse(&server.uri()).expect("valid url");
        GeminiClient::new("key".to_string(), "gemini-test".to_string(), base)
    }

    #[test]
    fn display_name_prefers_global_name() {
        let mut user = User::default();
        user.name = "mediator_bot".to_string();
        assert_eq!(display_name(&user), "mediator_bot");

        user.global_name = Some("Mediator".to_string());
        assert_eq!(display_name(&user), "Mediator");
    }

    #[test]
    fn handle_match_is_case_insensitive_substring() {
        assert!(mentions_handle("hey @GenZ_Mediator_Bot help", "genz_mediator_bot"));
        assert!(mentions_handle("@genz_mediator_bot", "genz_mediator_bot"));
        assert!(!mentions_handle("genz_mediator_bot without at", "genz_mediator_bot"));
        assert!(!mentions_handle("@someone_else", "genz_mediator_bot"));
        assert!(!mentions_handle("@", ""));
    }

    #[tokio::test]
    async fn unmentioned_messages_are_only_buffered() {
        let server = mediating_server().await;
        let client = client_for(&server);
        let mut log = GroupMessageLog::new();

        let result = record_and_analyze(&client, &mut log, "A", "hi", false, "bot").await;

        assert!(result.is_none());
        assert_eq!(log.lines(), &["A: hi".to_string()]);
        let requests = server.received_requests().await.expect("recording enabled");
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn mention_triggers_stateless_analysis_of_buffer() {
        let server = mediating_server().await;
        let client = client_for(&server);
        let mut log = GroupMessageLog::new();

        record_and_analyze(&client, &mut log, "A", "hi", false, "Mediator").await;
        let result = record_and_analyze(
            &client,
            &mut log,
            "B",
            "yo @genz_mediator_bot",
            true,
            "Mediator",
        )
        .await;

        assert_eq!(result.as_deref(), Some(ANALYSIS));
        assert_eq!(
            log.lines(),
            &[
                "A: hi".to_string(),
                "B: yo @genz_mediator_bot".to_string(),
                format!("Mediator: {ANALYSIS}"),
            ]
        );

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
        let body: Value = serde_json::from_slice(&requests[0].body).expect("json body");
        let contents = body["contents"].as_array().expect("contents array");
        assert_eq!(contents.len(), 1);
        let prompt = contents[0]["parts"][0]["text"].as_str().expect("prompt text");
        assert!(prompt.contains("A: hi\nB: yo @genz_mediator_bot"));
        assert!(prompt.contains("Summary:"));
        assert!(prompt.contains("Suggestion:"));
    }

    #[tokio::test]
    async fn group_log_stays_capped_across_mentions() {
        let server = mediating_server().await;
        let client = client_for(&server);
        let mut log = GroupMessageLog::new();

        for n in 0..15 {
            record_and_analyze(&client, &mut log, "U", &format!("m{n}"), n % 5 == 4, "bot").await;
            assert!(log.len() <= 10);
        }
        assert_eq!(log.len(), 10);
    }
}
