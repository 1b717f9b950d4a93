use std::sync::Arc;

use {
    secrecy::ExposeSecret,
    teloxide::{
        ApiError, RequestError,
        prelude::*,
        types::{AllowedUpdate, BotCommand, UpdateKind},
    },
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use {voicescribe_stt::Transcriber, voicescribe_summarize::Summarizer};

use crate::{config::TelegramConfig, handlers, state::BotState};

/// How long Telegram holds a `getUpdates` call open.
const POLL_TIMEOUT_SECS: u32 = 30;

/// Pause after a failed poll before trying again.
const POLL_RETRY_DELAY: std::time::Duration = std::time::Duration::from_secs(5);

/// Connect to the Bot API, register commands and start polling.
///
/// The polling loop runs on a background task until the returned
/// `CancellationToken` is cancelled. Each message is handled in its own
/// task, so a slow pipeline run never delays other chats. A conflicting
/// `getUpdates` consumer (another process using the same token) cancels
/// the token from inside the loop.
pub async fn start_polling(
    config: TelegramConfig,
    transcriber: Arc<dyn Transcriber>,
    summarizer: Arc<dyn Summarizer>,
) -> anyhow::Result<CancellationToken> {
    // Client timeout must exceed the long-polling timeout (30s) so the
    // HTTP client doesn't abort the request before Telegram responds.
    let client = teloxide::net::default_reqwest_settings()
        .timeout(std::time::Duration::from_secs(45))
        .build()?;
    let bot = Bot::with_client(config.token.expose_secret(), client);

    start_polling_with_bot(bot, config, transcriber, summarizer).await
}

/// Startup sequence and polling loop for an already-built bot handle.
pub(crate) async fn start_polling_with_bot(
    bot: Bot,
    config: TelegramConfig,
    transcriber: Arc<dyn Transcriber>,
    summarizer: Arc<dyn Summarizer>,
) -> anyhow::Result<CancellationToken> {
    // Verify credentials and get the bot username for `/command@bot` matching.
    let me = bot.get_me().await?;
    let bot_username = me.username.clone();

    // getUpdates is rejected while a webhook is set; clear any leftover.
    bot.delete_webhook().send().await?;

    // Publish the two commands so clients offer them in autocomplete.
    let commands = vec![
        BotCommand::new("start", "Приветствие и краткая инструкция"),
        BotCommand::new("help", "Что умеет бот"),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        warn!("failed to register bot commands: {e}");
    }

    info!(username = ?bot_username, "telegram bot connected (webhook cleared)");

    let cancel = CancellationToken::new();
    let state = Arc::new(BotState {
        bot: bot.clone(),
        bot_username,
        config,
        transcriber,
        summarizer,
    });

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        info!("starting telegram polling loop");
        let mut offset: i32 = 0;

        loop {
            if cancel_clone.is_cancelled() {
                info!("telegram polling stopped");
                break;
            }

            let result = bot
                .get_updates()
                .offset(offset)
                .timeout(POLL_TIMEOUT_SECS)
                .allowed_updates(vec![AllowedUpdate::Message])
                .await;

            match result {
                Ok(updates) => {
                    debug!(count = updates.len(), "got telegram updates");
                    for update in updates {
                        offset = update.id.as_offset();
                        match update.kind {
                            UpdateKind::Message(msg) => {
                                debug!(chat_id = msg.chat.id.0, "received telegram message");
                                let state = Arc::clone(&state);
                                tokio::spawn(async move {
                                    let chat_id = msg.chat.id;
                                    if let Err(e) = handlers::handle_message(&state, &msg).await {
                                        error!(
                                            chat_id = chat_id.0,
                                            error = %e,
                                            "message handler failed"
                                        );
                                    }
                                });
                            },
                            other => {
                                debug!("ignoring non-message update: {other:?}");
                            },
                        }
                    }
                },
                Err(e) => {
                    // Another consumer on the same token is fatal: Telegram
                    // will keep rejecting this loop as long as it exists.
                    if matches!(&e, RequestError::Api(ApiError::TerminatedByOtherGetUpdates)) {
                        error!("another instance is already polling with this token, stopping");
                        cancel_clone.cancel();
                        break;
                    }

                    warn!(error = %e, "telegram getUpdates failed");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                },
            }
        }
    });

    Ok(cancel)
}
