//! Thesis extraction for voicescribe.
//!
//! Defines the [`Summarizer`] trait the bot pipeline consumes plus the
//! OpenAI chat-completions implementation used in production.

pub mod openai;

use {anyhow::Result, async_trait::async_trait};

pub use openai::OpenAiSummarizer;

/// A service able to compress a transcript into a numbered thesis list.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &'static str;

    /// Extract the theses of one non-empty transcript.
    async fn summarize(&self, transcript: &str) -> Result<String>;
}
