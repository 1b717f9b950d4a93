//! Telegram front end for voicescribe.
//!
//! Receives updates over long polling with the teloxide library, routes
//! each message, and drives audio attachments through the
//! download → transcribe → summarize pipeline with edit-in-place status
//! replies.

pub mod bot;
pub mod config;
pub mod error;
pub mod handlers;
pub mod outbound;
pub mod pipeline;
pub mod state;
pub mod texts;

pub use {
    bot::start_polling,
    config::TelegramConfig,
    error::{Error, Result},
    state::BotState,
};
