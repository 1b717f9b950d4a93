//! Process configuration resolved from the environment.

use {
    anyhow::{Result, bail},
    secrecy::Secret,
};

/// Required: bot token issued by @BotFather.
const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";

/// Required: API key for transcription and summarization.
const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Optional: alternative OpenAI-compatible API base URL.
const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

/// Secrets and endpoints the process needs before any network activity.
pub struct Settings {
    pub telegram_token: Secret<String>,
    pub openai_api_key: Secret<String>,
    pub openai_base_url: Option<String>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("telegram_token", &"[REDACTED]")
            .field("openai_api_key", &"[REDACTED]")
            .field("openai_base_url", &self.openai_base_url)
            .finish()
    }
}

impl Settings {
    /// Read settings from the process environment. Both secrets are
    /// required; a missing one fails startup with the variable named in
    /// the error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            telegram_token: required(&lookup, TELEGRAM_BOT_TOKEN)?,
            openai_api_key: required(&lookup, OPENAI_API_KEY)?,
            openai_base_url: lookup(OPENAI_BASE_URL).filter(|value| !value.trim().is_empty()),
        })
    }
}

/// Blank values count as unset; an empty string in the environment is as
/// useless as no variable at all.
fn required(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Result<Secret<String>> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(Secret::new(value)),
        _ => bail!("{name} is not set"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use {super::*, secrecy::ExposeSecret};

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn all_variables_present() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:ABC"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
        ]))
        .expect("settings");

        assert_eq!(settings.telegram_token.expose_secret(), "123:ABC");
        assert_eq!(settings.openai_api_key.expose_secret(), "sk-test");
        assert_eq!(
            settings.openai_base_url.as_deref(),
            Some("http://localhost:8080/v1")
        );
    }

    #[test]
    fn base_url_is_optional() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:ABC"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .expect("settings");
        assert!(settings.openai_base_url.is_none());
    }

    #[test]
    fn blank_base_url_is_ignored() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:ABC"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "   "),
        ]))
        .expect("settings");
        assert!(settings.openai_base_url.is_none());
    }

    #[test]
    fn missing_token_names_the_variable() {
        let err = Settings::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")]))
            .expect_err("token required");
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let err = Settings::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:ABC"),
            ("OPENAI_API_KEY", ""),
        ]))
        .expect_err("api key required");
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:ABC"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .expect("settings");
        let debug = format!("{settings:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("123:ABC"));
        assert!(!debug.contains("sk-test"));
    }
}
