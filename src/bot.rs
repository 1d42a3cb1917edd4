//! Discord bot core logic and event handling.

use log::{debug, error, info, warn};
use poise::{
    Framework, FrameworkError, FrameworkOptions, PrefixFrameworkOptions, builtins,
    serenity_prelude::{ChannelId, ClientBuilder, Context, FullEvent, GatewayIntents, UserId},
};

use crate::chatbot::{display_name, handle_group_message, handle_private_message};
use crate::commands::all_commands;
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::gemini::GeminiClient;
use crate::history::{ConversationHistory, GroupMessageLog};
use crate::session::SessionStore;

const COMMAND_PREFIX: &str = "/";

/// Shared state handed to every command and event.
pub struct Data {
    gemini_client: GeminiClient,
    bot_handle: String,
    conversations: SessionStore<UserId, ConversationHistory>,
    group_logs: SessionStore<ChannelId, GroupMessageLog>,
}

impl Data {
    pub fn new(gemini_client: GeminiClient, bot_handle: String) -> Self {
        Self {
            gemini_client,
            bot_handle,
            conversations: SessionStore::new(),
            group_logs: SessionStore::new(),
        }
    }

    pub fn gemini_client(&self) -> &GeminiClient {
        &self.gemini_client
    }

    /// Lower-cased handle without the `@`.
    pub fn bot_handle(&self) -> &str {
        &self.bot_handle
    }

    /// Private chat histories keyed by user.
    pub fn conversations(&self) -> &SessionStore<UserId, ConversationHistory> {
        &self.conversations
    }

    /// Group message logs keyed by channel.
    pub fn group_logs(&self) -> &SessionStore<ChannelId, GroupMessageLog> {
        &self.group_logs
    }
}

/// Run the Discord bot.
///
/// # Errors
///
/// Fails on missing configuration or when the Discord client cannot start.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    debug!("Initializing Gemini client");
    let data = Data::new(
        GeminiClient::from_config(&config),
        config.bot_handle.clone(),
    );

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: all_commands(),
            prefix_options: PrefixFrameworkOptions {
                prefix: Some(COMMAND_PREFIX.to_string()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready and connected to Discord");
                debug!("Registering commands globally");
                builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully");
                Ok(data)
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(config.discord_token, intents)
        .framework(framework)
        .await?;

    info!("Gemini-powered mediator bot is running");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

async fn on_error(error: FrameworkError<'_, Data, BotError>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            error!("Command '{}' failed: {}", ctx.command().name, error);
            if let Err(e) = ctx.say(error.user_message()).await {
                warn!("Failed to send command error reply: {e}");
            }
        }
        other => {
            if let Err(e) = builtins::on_error(other).await {
                error!("Error while handling framework error: {e}");
            }
        }
    }
}

fn is_command(content: &str) -> bool {
    content.trim_start().starts_with(COMMAND_PREFIX)
}

/// Which handler, if any, an inbound message goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Skip,
    Private,
    Group,
}

fn route_message(from_bot: bool, in_guild: bool, content: &str) -> Route {
    if from_bot || is_command(content) {
        Route::Skip
    } else if in_guild {
        Route::Group
    } else {
        Route::Private
    }
}

async fn event_handler(ctx: &Context, event: &FullEvent, data: &Data) -> Result<()> {
    let FullEvent::Message { new_message } = event else {
        return Ok(());
    };

    let (bot_user_id, bot_name) = {
        let current_user = ctx.cache.current_user();
        (current_user.id, display_name(&current_user).to_string())
    };

    let from_bot = new_message.author.bot || new_message.author.id == bot_user_id;
    match route_message(
        from_bot,
        new_message.guild_id.is_some(),
        &new_message.content,
    ) {
        Route::Skip => {}
        Route::Private => handle_private_message(ctx, new_message, data).await,
        Route::Group => {
            handle_group_message(ctx, new_message, data, bot_user_id, &bot_name).await;
        }
    }

    Ok(())
}
