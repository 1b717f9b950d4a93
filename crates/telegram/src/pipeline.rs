//! The audio intake pipeline: download, transcribe, summarize, reply.
//!
//! One run per audio message. The run sends a status reply first and
//! always finishes by editing that reply exactly once with the terminal
//! text, whether the stages succeeded or not.

use std::path::{Path, PathBuf};

use {
    bytes::Bytes,
    teloxide::{
        Bot,
        net::Download,
        prelude::*,
        types::{ChatId, MessageId},
    },
    tokio::io::AsyncWriteExt,
    tracing::{debug, error, info, warn},
};

use voicescribe_stt::AudioInput;

use crate::{
    error::{Error, Result},
    handlers::AudioAttachment,
    outbound::StatusReply,
    state::BotState,
    texts,
};

/// Language hint forwarded to transcription.
const SPOKEN_LANGUAGE: &str = "ru";

/// How the remote stages ended short of a failure.
enum StageOutcome {
    Summarized { transcript: String, theses: String },
    NoSpeech,
}

/// Run the full pipeline for one audio attachment.
///
/// Stage failures do not propagate: they are collapsed into the terminal
/// reply text here, at the chat boundary. The returned error only covers
/// the status replies themselves.
pub async fn process_audio(
    state: &BotState,
    chat_id: ChatId,
    message_id: MessageId,
    attachment: AudioAttachment,
) -> Result<()> {
    info!(
        chat_id = chat_id.0,
        message_id = message_id.0,
        kind = ?attachment.kind,
        "processing audio message"
    );

    let status = StatusReply::send(&state.bot, chat_id, texts::PROCESSING).await?;

    let reply = match run_stages(state, chat_id, message_id, &attachment).await {
        Ok(StageOutcome::Summarized { transcript, theses }) => {
            texts::compose_result(&transcript, &theses)
        },
        Ok(StageOutcome::NoSpeech) => {
            info!(chat_id = chat_id.0, message_id = message_id.0, "no speech recognized");
            texts::NO_SPEECH.to_string()
        },
        Err(err) => {
            error!(
                chat_id = chat_id.0,
                message_id = message_id.0,
                error = %err,
                "audio pipeline failed"
            );
            err.user_message().to_string()
        },
    };

    status.edit(&state.bot, &reply).await
}

/// Download, transcribe and summarize one attachment. The staged file is
/// gone by the time this returns, on every path.
async fn run_stages(
    state: &BotState,
    chat_id: ChatId,
    message_id: MessageId,
    attachment: &AudioAttachment,
) -> Result<StageOutcome> {
    let staged = StagedAudio::download(
        &state.bot,
        &state.config.work_dir,
        chat_id,
        message_id,
        attachment,
    )
    .await?;

    let audio = staged.read().await?;
    debug!(
        bytes = audio.len(),
        path = %staged.path.display(),
        "audio attachment downloaded"
    );

    let transcript = state
        .transcriber
        .transcribe(AudioInput::new(audio, attachment.extension()).with_language(SPOKEN_LANGUAGE))
        .await
        .map_err(Error::Transcribe)?;
    debug!(
        transcriber = state.transcriber.name(),
        chars = transcript.text.chars().count(),
        language = ?transcript.language,
        duration = ?transcript.duration_seconds,
        "transcription stage complete"
    );

    if transcript.is_blank() {
        return Ok(StageOutcome::NoSpeech);
    }

    let theses = state
        .summarizer
        .summarize(&transcript.text)
        .await
        .map_err(Error::Summarize)?;
    debug!(
        summarizer = state.summarizer.name(),
        chars = theses.len(),
        "summarization stage complete"
    );

    Ok(StageOutcome::Summarized {
        transcript: transcript.text,
        theses,
    })
}

/// Deterministic staging path for one message's download. Chat and
/// message IDs make the name unique, so concurrent runs never collide.
fn staged_path(dir: &Path, chat_id: ChatId, message_id: MessageId, extension: &str) -> PathBuf {
    dir.join(format!("voice_{}_{}.{}", chat_id.0, message_id.0, extension))
}

/// Attachment bytes staged on disk for the duration of one pipeline run.
///
/// Removing the file is tied to drop, so no run can leak its download
/// regardless of which stage fails.
struct StagedAudio {
    path: PathBuf,
}

impl StagedAudio {
    /// Resolve the attachment on the Bot API and download it to the
    /// staging path.
    async fn download(
        bot: &Bot,
        dir: &Path,
        chat_id: ChatId,
        message_id: MessageId,
        attachment: &AudioAttachment,
    ) -> Result<Self> {
        let file = bot.get_file(&attachment.file_id).await?;

        // Guard exists before the first byte hits disk.
        let staged = Self {
            path: staged_path(dir, chat_id, message_id, attachment.extension()),
        };

        let mut dst = tokio::fs::File::create(&staged.path).await?;
        bot.download_file(&file.path, &mut dst).await?;
        dst.flush().await?;

        Ok(staged)
    }

    async fn read(&self) -> Result<Bytes> {
        Ok(tokio::fs::read(&self.path).await?.into())
    }
}

impl Drop for StagedAudio {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path)
            && err.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %err, "failed to remove staged audio file");
        }
    }
}
