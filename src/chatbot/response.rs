//! Response sending utilities for Discord.

use log::{info, warn};
use poise::serenity_prelude::{Context, Message as SerenityMessage};

use crate::error::Result;

/// Discord's message limit for standard users.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Splits `text` into chunks of at most `limit` characters.
///
/// Prefers the last newline inside the window, otherwise cuts at the limit.
/// Never splits a UTF-8 character. Blank text and blank chunks are dropped,
/// since Discord rejects messages without visible content.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        let window_end = remaining
            .char_indices()
            .nth(limit)
            .map_or(remaining.len(), |(idx, _)| idx);

        if window_end == remaining.len() {
            chunks.push(remaining.to_string());
            break;
        }

        let split_at = match remaining[..window_end].rfind('\n') {
            Some(idx) if idx > 0 => idx,
            _ => window_end,
        };

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..]
            .strip_prefix('\n')
            .unwrap_or(&remaining[split_at..]);
    }

    chunks.retain(|chunk| !chunk.trim().is_empty());
    chunks
}

/// Send a reply in the channel of `new_message`.
///
/// With `threaded`, the first chunk references the triggering message.
pub async fn send_reply(
    ctx: &Context,
    new_message: &SerenityMessage,
    text: &str,
    threaded: bool,
) -> Result<()> {
    let chunks = split_message(text, DISCORD_MESSAGE_LIMIT);
    if chunks.is_empty() {
        warn!("No response content generated");
        return Ok(());
    }

    for (idx, chunk) in chunks.iter().enumerate() {
        if threaded && idx == 0 {
            new_message.reply(&ctx.http, chunk).await?;
        } else {
            new_message.channel_id.say(&ctx.http, chunk).await?;
        }
    }

    info!(
        "Replied to {} in channel {} ({} message(s)): {}",
        new_message.author.tag(),
        new_message.channel_id,
        chunks.len(),
        text
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_single_chunk() {
        assert_eq!(split_message("hello", 10), vec!["hello".to_string()]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(split_message("", 10).is_empty());
    }

    #[test]
    fn whitespace_only_text_has_no_chunks() {
        assert!(split_message("  \n", DISCORD_MESSAGE_LIMIT).is_empty());
        assert!(split_message("\n\n\t ", 2).is_empty());
    }

    #[test]
    fn blank_chunks_are_dropped() {
        let chunks = split_message("abcd\n    \nefgh", 5);
        assert_eq!(chunks, vec!["abcd", "efgh"]);
    }

    #[test]
    fn prefers_newline_boundaries() {
        let chunks = split_message("aaaa\nbbbb\ncc", 7);
        assert_eq!(chunks, vec!["aaaa", "bbbb\ncc"]);
    }

    #[test]
    fn hard_cuts_without_newline() {
        let chunks = split_message("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn never_splits_multibyte_characters() {
        let text = "é".repeat(5);
        let chunks = split_message(&text, 2);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn chunks_respect_discord_limit() {
        let text = "word ".repeat(1000);
        let chunks = split_message(&text, DISCORD_MESSAGE_LIMIT);
        assert!(chunks.len() > 1);
        assert!(
            chunks
                .iter()
                .all(|c| c.chars().count() <= DISCORD_MESSAGE_LIMIT)
        );
        assert_eq!(chunks.concat(), text);
    }
}
