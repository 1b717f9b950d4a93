//! OpenAI chat-completions client producing the thesis list.

use std::time::Duration;

use {
    anyhow::{Context, Result, anyhow, bail},
    async_trait::async_trait,
    reqwest::Client,
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, trace},
};

use crate::Summarizer;

/// OpenAI API base URL.
const API_BASE: &str = "https://api.openai.com/v1";

/// Default chat model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Low temperature keeps the theses close to the source text.
const TEMPERATURE: f64 = 0.3;

/// Hard cap on generated tokens; seven short theses fit comfortably.
const MAX_TOKENS: u32 = 1000;

/// Bounded so a stalled service cannot pin a pipeline run forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Instruction governing the extraction: 3-7 theses, source order, no
/// interpretation, numbered list.
const SYSTEM_PROMPT: &str = "\
Ты — ассистент для обработки транскрибированных голосовых сообщений.

Твоя задача — выделить ключевые тезисы из текста.

Правила:
- Количество тезисов: от 3 до 7 (зависит от объёма информации)
- Каждый тезис — одна законченная мысль
- Порядок — по логике изложения в тексте
- Без интерпретаций и домыслов — только то, что сказано
- Формат: нумерованный список

Если текст слишком короткий (1-2 предложения), выдели 1-2 главные мысли.";

/// Client for the OpenAI `/chat/completions` endpoint with fixed
/// low-variance generation settings.
#[derive(Clone)]
pub struct OpenAiSummarizer {
    client: Client,
    api_key: Secret<String>,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiSummarizer {
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

/// Chat messages for one extraction request.
fn build_messages(transcript: &str) -> serde_json::Value {
    serde_json::json!([
        { "role": "system", "content": SYSTEM_PROMPT },
        {
            "role": "user",
            "content": format!("Выдели тезисы из следующего текста:\n\n{transcript}"),
        },
    ])
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn summarize(&self, transcript: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": build_messages(transcript),
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        debug!(
            model = %self.model,
            transcript_chars = transcript.len(),
            "sending summarization request"
        );
        trace!(
            body = %serde_json::to_string(&body).unwrap_or_default(),
            "summarization request body"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("failed to send summarization request")?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("summarization request failed: {status} - {body_text}");
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .context("failed to parse summarization response")?;

        let theses = payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| anyhow!("summarization response contained no content"))?;

        debug!(chars = theses.len(), "summarization complete");

        Ok(theses.to_string())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let client = OpenAiSummarizer::new(Secret::new("sk-secret".to_string()));
        let debug = format!("{client:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn defaults_applied() {
        let client = OpenAiSummarizer::new(Secret::new("k".to_string()));
        assert_eq!(client.model, DEFAULT_MODEL);
        assert_eq!(client.base_url, API_BASE);
        assert_eq!(client.name(), "openai");
    }

    #[test]
    fn messages_carry_system_rules_and_transcript() {
        let messages = build_messages("тестовый текст");
        assert_eq!(messages[0]["role"], "system");
        assert!(
            messages[0]["content"]
                .as_str()
                .unwrap()
                .contains("от 3 до 7")
        );
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(
            messages[1]["content"],
            "Выдели тезисы из следующего текста:\n\nтестовый текст"
        );
    }

    mod integration {
        use {
            super::*,
            wiremock::{
                Mock, MockServer, ResponseTemplate,
                matchers::{body_partial_json, header, method, path},
            },
        };

        fn test_client(server: &MockServer) -> OpenAiSummarizer {
            OpenAiSummarizer::with_options(
                Secret::new("test-key".to_string()),
                None,
                Some(server.uri()),
            )
        }

        #[tokio::test]
        async fn summarize_success() {
            let server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .and(header("Authorization", "Bearer test-key"))
                .and(body_partial_json(serde_json::json!({
                    "model": "gpt-4o-mini",
                    "temperature": 0.3,
                    "max_tokens": 1000
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": "1. Первый тезис.\n2. Второй тезис." } }
                    ]
                })))
                .expect(1)
                .mount(&server)
                .await;

            let client = test_client(&server);
            let theses = client.summarize("длинный рассказ о делах").await.unwrap();

            assert_eq!(theses, "1. Первый тезис.\n2. Второй тезис.");
        }

        #[tokio::test]
        async fn summarize_error_carries_status_and_body() {
            let server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(
                    ResponseTemplate::new(429).set_body_string(r#"{"error":"rate limited"}"#),
                )
                .expect(1)
                .mount(&server)
                .await;

            let client = test_client(&server);
            let err = client.summarize("текст").await.unwrap_err();

            let message = format!("{err:#}");
            assert!(message.contains("429"), "unexpected error: {message}");
            assert!(message.contains("rate limited"));
        }

        #[tokio::test]
        async fn summarize_rejects_empty_content() {
            let server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "choices": [ { "message": { "role": "assistant", "content": "  " } } ]
                })))
                .mount(&server)
                .await;

            let client = test_client(&server);
            assert!(client.summarize("текст").await.is_err());
        }
    }
}
