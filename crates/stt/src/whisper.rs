//! OpenAI Whisper speech-to-text client.

use std::time::Duration;

use {
    anyhow::{Context, Result, anyhow},
    async_trait::async_trait,
    reqwest::{
        Client,
        multipart::{Form, Part},
    },
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::debug,
};

use crate::{AudioInput, Transcriber, Transcript};

/// OpenAI API base URL.
const API_BASE: &str = "https://api.openai.com/v1";

/// Default transcription model.
const DEFAULT_MODEL: &str = "whisper-1";

/// Upload requests are bounded so a stalled service cannot pin a pipeline
/// run forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the OpenAI `/audio/transcriptions` endpoint.
#[derive(Clone)]
pub struct WhisperClient {
    client: Client,
    api_key: Secret<String>,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for WhisperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperClient")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WhisperClient {
    #[must_use]
    pub fn new(api_key: Secret<String>) -> Self {
        Self::with_options(api_key, None, None)
    }

    /// Build a client with an overridden model or API base; `None` keeps
    /// the default.
    #[must_use]
    pub fn with_options(
        api_key: Secret<String>,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| API_BASE.to_string()),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    fn name(&self) -> &'static str {
        "whisper"
    }

    async fn transcribe(&self, input: AudioInput) -> Result<Transcript> {
        let filename = format!("audio.{}", input.extension);
        let mime_type = mime_for_extension(&input.extension);

        let file_part = Part::bytes(input.bytes.to_vec())
            .file_name(filename)
            .mime_str(mime_type)
            .context("failed to create multipart file part")?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");

        if let Some(language) = input.language {
            form = form.text("language", language);
        }

        debug!(model = %self.model, mime_type, "sending transcription request");

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .multipart(form)
            .send()
            .await
            .context("failed to send transcription request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("transcription request failed: {status} - {body}"));
        }

        let whisper: WhisperResponse = response
            .json()
            .await
            .context("failed to parse transcription response")?;

        debug!(
            chars = whisper.text.len(),
            language = ?whisper.language,
            duration = ?whisper.duration,
            "transcription complete"
        );

        Ok(Transcript {
            text: whisper.text,
            language: whisper.language,
            duration_seconds: whisper.duration,
        })
    }
}

/// Response from the transcriptions endpoint in `verbose_json` format.
/// Everything beyond the text is optional; plain `json` responses carry
/// only `text`.
#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f32>,
}

/// MIME hint for the multipart upload. The service mainly keys off the
/// filename, so unknown containers fall back to a generic type.
fn mime_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "wav" => "audio/wav",
        "m4a" | "mp4" => "audio/mp4",
        "flac" => "audio/flac",
        "webm" => "audio/webm",
        _ => "application/octet-stream",
    }
}
