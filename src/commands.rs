//! Slash and `/`-prefix commands.

use log::info;

use crate::bot::Data;
use crate::error::{BotError, Result};
use crate::history::ConversationHistory;

/// Context type for bot commands.
type Context<'a> = poise::Context<'a, Data, BotError>;

fn welcome_message(name: &str, handle: &str) -> String {
    format!(
        "👋 Hi {name}! I'm your AI Mediator Bot powered by Gemini Flash.\n\n\
         In servers, mention me (@{handle}) to analyze conversations.\n\n\
         Commands available:\n\
         /help - Show help message\n\
         /chat - Start a conversation\n\
         /stop - End conversation"
    )
}

fn help_message(handle: &str) -> String {
    format!(
        "🤖 **AI Mediator Bot Help** 🤖\n\n\
         **Server Channel Features:**\n\
         - Mention me (@{handle}) to analyze recent messages\n\
         - I'll provide neutral summaries and suggestions\n\n\
         **Private Chat Commands:**\n\
         /start - Welcome message\n\
         /help - Show this help\n\
         /chat - Start 1-on-1 conversation\n\
         /stop - End conversation\n\n\
         Powered by Google's Gemini Flash"
    )
}

/// Show the welcome message.
#[poise::command(slash_command, prefix_command)]
pub async fn start(ctx: Context<'_>) -> Result<()> {
    let user = ctx.author();
    let name = user.global_name.as_ref().unwrap_or(&user.name);
    ctx.say(welcome_message(name, ctx.data().bot_handle())).await?;
    Ok(())
}

/// Show what the bot can do.
#[poise::command(slash_command, prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<()> {
    ctx.say(help_message(ctx.data().bot_handle())).await?;
    Ok(())
}

/// Start a 1-on-1 conversation with the AI.
#[poise::command(slash_command, prefix_command)]
pub async fn chat(ctx: Context<'_>) -> Result<()> {
    ctx.data()
        .conversations()
        .set(&ctx.author().id, ConversationHistory::new())
        .await;
    info!("Started chat session for {}", ctx.author().tag());

    ctx.say(
        "💬 You're now chatting with Gemini Flash AI. Send me a direct message!\n\
         Type /stop to end the chat.",
    )
    .await?;
    Ok(())
}

/// End the conversation with the AI.
#[poise::command(slash_command, prefix_command)]
pub async fn stop(ctx: Context<'_>) -> Result<()> {
    if ctx
        .data()
        .conversations()
        .remove(&ctx.author().id)
        .await
        .is_some()
    {
        info!("Ended chat session for {}", ctx.author().tag());
    }

    ctx.say("👍 Chat ended. Start again with /chat!").await?;
    Ok(())
}

/// Get all bot commands.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<Data, BotError>> {
    vec![start(), help(), chat(), stop()]
}
