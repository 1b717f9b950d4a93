use thiserror::Error;

use crate::texts;

/// Marker some transcription backends put in their error body when the
/// audio itself, not the request, is the problem. Matching it is best
/// effort: the check scans rendered error text, so a backend that words
/// things differently simply falls back to the generic reply.
const AUDIO_QUALITY_SIGNATURE: &str = "Could not process audio";

/// Failures of one audio pipeline run or outbound send.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Telegram(#[from] teloxide::RequestError),

    #[error(transparent)]
    Download(#[from] teloxide::DownloadError),

    #[error("staged audio io: {0}")]
    Io(#[from] std::io::Error),

    #[error("transcription failed: {0:#}")]
    Transcribe(anyhow::Error),

    #[error("summarization failed: {0:#}")]
    Summarize(anyhow::Error),
}

impl Error {
    /// Reply text shown to the chat when this failure ends a pipeline
    /// run. Every failure maps to the generic retry text except an
    /// audio-quality rejection, which gets a recording hint instead.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        if self.to_string().contains(AUDIO_QUALITY_SIGNATURE) {
            texts::LOW_AUDIO_QUALITY
        } else {
            texts::PIPELINE_FAILED
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, anyhow::anyhow};

    #[test]
    fn quality_rejection_selects_recording_hint() {
        let err = Error::Transcribe(anyhow!(
            "transcription request failed: 400 Bad Request - {{\"error\":{{\"message\":\"Could not process audio: too quiet\"}}}}"
        ));
        assert_eq!(err.user_message(), texts::LOW_AUDIO_QUALITY);
    }

    #[test]
    fn quality_signature_found_through_context_chain() {
        let err = Error::Transcribe(
            anyhow!("Could not process audio").context("transcription request failed"),
        );
        assert_eq!(err.user_message(), texts::LOW_AUDIO_QUALITY);
    }

    #[test]
    fn other_failures_select_generic_text() {
        let err = Error::Summarize(anyhow!("summarization request failed: 500 - boom"));
        assert_eq!(err.user_message(), texts::PIPELINE_FAILED);

        let err = Error::Io(std::io::Error::other("disk full"));
        assert_eq!(err.user_message(), texts::PIPELINE_FAILED);
    }

    #[test]
    fn display_includes_wrapped_cause() {
        let err = Error::Transcribe(anyhow!("HTTP 400 - body"));
        assert!(err.to_string().contains("HTTP 400 - body"));
    }
}
