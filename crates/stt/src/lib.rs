//! Speech-to-text clients for voicescribe.
//!
//! Defines the [`Transcriber`] trait the bot pipeline consumes plus the
//! OpenAI Whisper implementation used in production.

pub mod whisper;

use {anyhow::Result, async_trait::async_trait, bytes::Bytes};

pub use whisper::WhisperClient;

/// One audio payload ready for transcription.
#[derive(Debug, Clone)]
pub struct AudioInput {
    /// Raw audio bytes, exactly as the messaging platform delivered them.
    pub bytes: Bytes,
    /// Declared container extension (`ogg`, `mp3`, ...); drives the upload
    /// filename and MIME hint.
    pub extension: String,
    /// Spoken-language hint as an ISO 639-1 code.
    pub language: Option<String>,
}

impl AudioInput {
    #[must_use]
    pub fn new(bytes: Bytes, extension: impl Into<String>) -> Self {
        Self {
            bytes,
            extension: extension.into(),
            language: None,
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// What a transcription service heard in one payload.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Recognized text; empty or whitespace when no speech was found.
    pub text: String,
    /// Detected language, when the service reports one.
    pub language: Option<String>,
    /// Audio duration in seconds, when the service reports it.
    pub duration_seconds: Option<f32>,
}

impl Transcript {
    /// True when the service produced no usable text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A speech-to-text backend.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &'static str;

    /// Transcribe one audio payload.
    async fn transcribe(&self, input: AudioInput) -> Result<Transcript>;
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_transcript_detected() {
        let transcript = Transcript {
            text: "  \n\t ".into(),
            language: None,
            duration_seconds: None,
        };
        assert!(transcript.is_blank());
    }

    #[test]
    fn non_blank_transcript_detected() {
        let transcript = Transcript {
            text: "привет".into(),
            language: Some("ru".into()),
            duration_seconds: Some(2.4),
        };
        assert!(!transcript.is_blank());
    }

    #[test]
    fn audio_input_builder_sets_language() {
        let input = AudioInput::new(Bytes::from_static(b"abc"), "ogg").with_language("ru");
        assert_eq!(input.extension, "ogg");
        assert_eq!(input.language.as_deref(), Some("ru"));
        assert_eq!(input.bytes.len(), 3);
    }
}
