//! Inbound message routing.
//!
//! Every update is classified into exactly one [`Route`] by inspecting
//! the message payload; executing the route produces exactly one reply
//! (or none for messages outside the bot's scope).

use {
    teloxide::{
        prelude::*,
        types::{MediaKind, MessageKind},
    },
    tracing::debug,
};

use crate::{error::Result, outbound, pipeline, state::BotState, texts};

/// Routing decision for one incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/start` greeting.
    Welcome,
    /// `/help` usage text.
    Help,
    /// Voice, audio or audio-typed document to feed the pipeline.
    Audio(AudioAttachment),
    /// Anything else a user could expect an answer to.
    Unsupported,
    /// Commands for other bots, unknown commands, service messages.
    Silent,
}

/// One downloadable audio payload extracted from a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAttachment {
    pub file_id: String,
    pub file_name: Option<String>,
    pub kind: AudioKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioKind {
    /// In-app voice note; always OGG Opus, never carries a filename.
    Voice,
    /// Music-style audio attachment.
    Audio,
    /// Generic file whose declared MIME type is `audio/*`.
    Document,
}

impl AudioAttachment {
    /// Container extension for the staged file: the last dot-separated
    /// component of the declared filename (case preserved), with a
    /// per-kind fallback when the name is absent or ends in a dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        match self.kind {
            AudioKind::Voice => "ogg",
            AudioKind::Audio => file_suffix(self.file_name.as_deref()).unwrap_or("mp3"),
            AudioKind::Document => file_suffix(self.file_name.as_deref()).unwrap_or("ogg"),
        }
    }
}

/// Last dot-separated component of a filename. A dotless name is its own
/// suffix; empty components fall through to the caller's default.
fn file_suffix(file_name: Option<&str>) -> Option<&str> {
    file_name
        .and_then(|name| name.rsplit('.').next())
        .filter(|suffix| !suffix.is_empty())
}

/// Classify one message. Pure: no Telegram calls, no side effects.
#[must_use]
pub fn route_message(msg: &Message, bot_username: Option<&str>) -> Route {
    let MessageKind::Common(common) = &msg.kind else {
        // Service messages (member joins, pins, ...) are not something a
        // user sent to the bot.
        return Route::Silent;
    };

    match &common.media_kind {
        MediaKind::Voice(v) => Route::Audio(AudioAttachment {
            file_id: v.voice.file.id.clone(),
            file_name: None,
            kind: AudioKind::Voice,
        }),
        MediaKind::Audio(a) => Route::Audio(AudioAttachment {
            file_id: a.audio.file.id.clone(),
            file_name: a.audio.file_name.clone(),
            kind: AudioKind::Audio,
        }),
        MediaKind::Document(d) => {
            let is_audio = d
                .document
                .mime_type
                .as_ref()
                .is_some_and(|m| m.as_ref().starts_with("audio/"));
            if is_audio {
                Route::Audio(AudioAttachment {
                    file_id: d.document.file.id.clone(),
                    file_name: d.document.file_name.clone(),
                    kind: AudioKind::Document,
                })
            } else {
                Route::Unsupported
            }
        },
        MediaKind::Text(t) if t.text.starts_with('/') => {
            match parse_command(&t.text, bot_username) {
                Some(cmd) if cmd.eq_ignore_ascii_case("start") => Route::Welcome,
                Some(cmd) if cmd.eq_ignore_ascii_case("help") => Route::Help,
                _ => Route::Silent,
            }
        },
        _ => Route::Unsupported,
    }
}

/// First token of a command-shaped text without the leading slash or an
/// `@botname` suffix addressed to this bot. `None` when the suffix
/// addresses a different bot.
fn parse_command<'t>(text: &'t str, bot_username: Option<&str>) -> Option<&'t str> {
    let token = text.split_whitespace().next()?;
    let command = token.strip_prefix('/')?;
    match command.split_once('@') {
        Some((name, addressee)) => bot_username
            .is_some_and(|username| username.eq_ignore_ascii_case(addressee))
            .then_some(name),
        None => Some(command),
    }
}

/// Handle one inbound message end to end.
pub async fn handle_message(state: &BotState, msg: &Message) -> Result<()> {
    match route_message(msg, state.bot_username.as_deref()) {
        Route::Welcome => outbound::send_text(&state.bot, msg.chat.id, texts::WELCOME).await,
        Route::Help => outbound::send_text(&state.bot, msg.chat.id, texts::HELP).await,
        Route::Audio(attachment) => {
            pipeline::process_audio(state, msg.chat.id, msg.id, attachment).await
        },
        Route::Unsupported => {
            debug!(chat_id = msg.chat.id.0, "rejecting unsupported message");
            outbound::send_text(&state.bot, msg.chat.id, texts::UNSUPPORTED).await
        },
        Route::Silent => {
            debug!(chat_id = msg.chat.id.0, "ignoring message outside the bot's scope");
            Ok(())
        },
    }
}
