use std::sync::Arc;

use {voicescribe_stt::Transcriber, voicescribe_summarize::Summarizer};

use crate::config::TelegramConfig;

/// Runtime state shared by every handler invocation.
///
/// The clients are stateless, so one instance of each is built at startup
/// and shared by reference across concurrent message tasks.
pub struct BotState {
    pub bot: teloxide::Bot,
    /// Username reported by `getMe`; used to match `/command@bot` forms.
    pub bot_username: Option<String>,
    pub config: TelegramConfig,
    pub transcriber: Arc<dyn Transcriber>,
    pub summarizer: Arc<dyn Summarizer>,
}
