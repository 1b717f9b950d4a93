use std::path::PathBuf;

use secrecy::Secret;

/// Configuration for the Telegram front end.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    pub token: Secret<String>,

    /// Directory where in-flight audio downloads are staged. Files live
    /// there only for the duration of one pipeline run.
    pub work_dir: PathBuf,
}

impl TelegramConfig {
    /// Config with the default staging directory (the working directory).
    #[must_use]
    pub fn new(token: Secret<String>) -> Self {
        Self {
            token,
            work_dir: PathBuf::from("."),
        }
    }

    #[must_use]
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"[REDACTED]")
            .field("work_dir", &self.work_dir)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret};

    #[test]
    fn default_work_dir_is_current_directory() {
        let cfg = TelegramConfig::new(Secret::new("123:ABC".into()));
        assert_eq!(cfg.work_dir, PathBuf::from("."));
        assert_eq!(cfg.token.expose_secret(), "123:ABC");
    }

    #[test]
    fn with_work_dir_overrides_staging_directory() {
        let cfg = TelegramConfig::new(Secret::new("123:ABC".into())).with_work_dir("/tmp/stage");
        assert_eq!(cfg.work_dir, PathBuf::from("/tmp/stage"));
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = TelegramConfig::new(Secret::new("123:ABC".into()));
        let debug = format!("{cfg:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("123:ABC"));
    }
}
