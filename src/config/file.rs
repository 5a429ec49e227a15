//! TOML configuration file loading
//!
//! Supports `~/.config/telegram-bot/config.toml` as a persistent config
//! source. All fields are optional; the file is a partial overlay on top of
//! defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::UpdateType;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct BotConfigFile {
    /// Bot token from @BotFather
    #[serde(default)]
    pub token: Option<String>,

    /// Bot API server base URL (e.g. a self-hosted `telegram-bot-api`)
    #[serde(default)]
    pub api_url: Option<String>,

    /// HTTP settings
    #[serde(default)]
    pub http: HttpFileConfig,

    /// Proxy settings
    #[serde(default)]
    pub proxy: Option<ProxyFileConfig>,

    /// Long-polling settings
    #[serde(default)]
    pub polling: PollingFileConfig,
}

/// HTTP client configuration
#[derive(Debug, Default, Deserialize)]
pub struct HttpFileConfig {
    /// Deadline for ordinary calls, in seconds
    pub request_timeout_secs: Option<u64>,

    /// Extra time granted on top of the long-poll wait, in seconds
    pub long_poll_margin_secs: Option<u64>,
}

/// Proxy configuration
#[derive(Debug, Default, Deserialize)]
pub struct ProxyFileConfig {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Long-polling configuration
#[derive(Debug, Default, Deserialize)]
pub struct PollingFileConfig {
    /// Server-side wait per `getUpdates` call, in seconds
    pub timeout_secs: Option<u32>,

    /// Maximum updates per batch (1-100)
    pub limit: Option<u8>,

    /// Update types to receive; omit for the server default
    pub allowed_updates: Option<Vec<UpdateType>>,

    /// First backoff delay after a failed iteration, in milliseconds
    pub backoff_base_ms: Option<u64>,

    /// Backoff ceiling, in milliseconds
    pub backoff_max_ms: Option<u64>,

    /// Consecutive failures before giving up; omit to retry forever
    pub max_retries: Option<u32>,
}

/// Load the TOML config file from the standard path
///
/// Returns `BotConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> BotConfigFile {
    config_file_path().map_or_else(BotConfigFile::default, |path| load_config_from(&path))
}

/// Load a TOML config file from `path`
///
/// Returns `BotConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_from(path: &Path) -> BotConfigFile {
    if !path.exists() {
        return BotConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                BotConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            BotConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/telegram-bot/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("telegram-bot").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_partial_file() {
        let fc: BotConfigFile = toml::from_str(
            r#"
            token = "123:ABC"

            [polling]
            timeout_secs = 50
            allowed_updates = ["message", "callback_query"]
            "#,
        )
        .unwrap();

        assert_eq!(fc.token.as_deref(), Some("123:ABC"));
        assert_eq!(fc.polling.timeout_secs, Some(50));
        assert_eq!(
            fc.polling.allowed_updates,
            Some(vec![UpdateType::Message, UpdateType::CallbackQuery])
        );
        assert!(fc.proxy.is_none());
        assert_eq!(fc.http.request_timeout_secs, None);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let fc = load_config_from(Path::new("/nonexistent/telegram-bot/config.toml"));
        assert!(fc.token.is_none());
    }

    #[test]
    fn unparsable_file_yields_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "token = [not toml").unwrap();
        let fc = load_config_from(file.path());
        assert!(fc.token.is_none());
    }

    #[test]
    fn reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url = \"http://localhost:8081\"\n[proxy]\nurl = \"socks5://127.0.0.1:1080\"").unwrap();
        let fc = load_config_from(file.path());
        assert_eq!(fc.api_url.as_deref(), Some("http://localhost:8081"));
        assert_eq!(
            fc.proxy.and_then(|p| p.url).as_deref(),
            Some("socks5://127.0.0.1:1080")
        );
    }
}
