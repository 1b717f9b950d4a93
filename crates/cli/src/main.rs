mod settings;

use std::sync::Arc;

use {
    clap::Parser,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    voicescribe_stt::{Transcriber, WhisperClient},
    voicescribe_summarize::{OpenAiSummarizer, Summarizer},
    voicescribe_telegram::TelegramConfig,
};

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "voicescribe", about = "VoiceScribe — Telegram voice transcription bot")]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "voicescribe starting");

    // Both secrets are checked here, before anything touches the network.
    let settings = Settings::from_env()?;

    let transcriber: Arc<dyn Transcriber> = Arc::new(WhisperClient::with_options(
        settings.openai_api_key.clone(),
        None,
        settings.openai_base_url.clone(),
    ));
    let summarizer: Arc<dyn Summarizer> = Arc::new(OpenAiSummarizer::with_options(
        settings.openai_api_key.clone(),
        None,
        settings.openai_base_url.clone(),
    ));
    let config = TelegramConfig::new(settings.telegram_token.clone());

    let cancel = voicescribe_telegram::start_polling(config, transcriber, summarizer).await?;
    info!("voicescribe is running, press Ctrl+C to stop");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received, stopping");
            cancel.cancel();
        },
        () = cancel.cancelled() => {
            info!("polling loop stopped");
        },
    }

    Ok(())
}
