//! Outbound send/edit helpers.
//!
//! Every handled message produces exactly one reply: commands and
//! rejections are sent once, the audio pipeline sends a status message
//! and later edits it in place with the terminal text.

use {
    teloxide::{prelude::*, types::MessageId},
    tracing::debug,
};

use crate::error::Result;

/// Telegram message size limit.
pub const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

/// Truncate to `max_len` bytes without splitting a code point.
#[must_use]
pub fn truncate_at_char_boundary(text: &str, max_len: usize) -> &str {
    &text[..text.floor_char_boundary(max_len)]
}

/// Send a one-shot reply into a chat.
pub async fn send_text(bot: &Bot, chat_id: ChatId, text: &str) -> Result<()> {
    bot.send_message(chat_id, truncate_at_char_boundary(text, TELEGRAM_MAX_MESSAGE_LEN))
        .await?;
    Ok(())
}

/// Handle to the single status message of one pipeline run.
///
/// `edit` consumes the handle, so a run can replace the status text at
/// most once and only after sending it.
#[derive(Debug)]
pub struct StatusReply {
    chat_id: ChatId,
    message_id: MessageId,
}

impl StatusReply {
    /// Send the initial status message.
    pub async fn send(bot: &Bot, chat_id: ChatId, text: &str) -> Result<Self> {
        let message = bot.send_message(chat_id, text).await?;
        debug!(chat_id = chat_id.0, message_id = message.id.0, "status reply sent");
        Ok(Self {
            chat_id,
            message_id: message.id,
        })
    }

    /// Replace the status text with the terminal result.
    pub async fn edit(self, bot: &Bot, text: &str) -> Result<()> {
        bot.edit_message_text(
            self.chat_id,
            self.message_id,
            truncate_at_char_boundary(text, TELEGRAM_MAX_MESSAGE_LEN),
        )
        .await?;
        Ok(())
    }
}
