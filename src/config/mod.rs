//! Configuration for the Bot API runtime
//!
//! Values are layered env > TOML file > default. See [`file`] for the
//! file schema and location.

pub mod file;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::polling::BackoffPolicy;
use crate::types::UpdateType;
use crate::{Error, Result};

use file::BotConfigFile;

/// Public Bot API server
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_LONG_POLL_MARGIN: Duration = Duration::from_secs(10);
const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_POLL_LIMIT: u8 = 100;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token from @BotFather, embedded in every request path
    pub token: SecretString,

    /// Bot API server base URL
    pub api_url: Url,

    /// Outbound proxy, if any
    pub proxy: Option<ProxyConfig>,

    /// Deadline for ordinary calls
    pub request_timeout: Duration,

    /// Extra time granted on top of the long-poll wait
    pub long_poll_margin: Duration,

    /// Long-polling settings
    pub polling: PollingConfig,
}

/// Outbound proxy settings
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Proxy URL (`http://`, `https://` or `socks5://`)
    pub url: Url,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

/// Long-polling settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingConfig {
    /// How long the server may hold each `getUpdates` call open
    pub timeout: Duration,

    /// Maximum updates per batch, 1 to 100
    pub limit: u8,

    /// Update types to receive; `None` keeps the server's current setting
    pub allowed_updates: Option<Vec<UpdateType>>,

    /// Delay policy between failed iterations
    pub backoff: BackoffPolicy,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_POLL_TIMEOUT,
            limit: DEFAULT_POLL_LIMIT,
            allowed_updates: None,
            backoff: BackoffPolicy::default(),
        }
    }
}

impl Config {
    /// Configuration with defaults for everything but the token
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self {
            token: SecretString::from(token.to_string()),
            api_url: default_api_url(),
            proxy: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            long_poll_margin: DEFAULT_LONG_POLL_MARGIN,
            polling: PollingConfig::default(),
        }
    }

    /// Load configuration from the environment and the config file
    ///
    /// # Errors
    ///
    /// Returns error if no token is configured or a URL fails to parse
    pub fn load() -> Result<Self> {
        Self::from_sources(|key| std::env::var(key).ok(), file::load_config_file())
    }

    /// Merge `env` lookups over a parsed config file, then defaults
    ///
    /// # Errors
    ///
    /// Returns error if no token is configured or a URL fails to parse
    pub fn from_sources(env: impl Fn(&str) -> Option<String>, fc: BotConfigFile) -> Result<Self> {
        let token = env("TELEGRAM_BOT_TOKEN")
            .or(fc.token)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                Error::InvalidParameter(
                    "bot token not set (TELEGRAM_BOT_TOKEN or `token` in config file)".to_string(),
                )
            })?;

        let api_url = match env("TELEGRAM_API_URL").or(fc.api_url) {
            Some(raw) => parse_url("api_url", &raw)?,
            None => default_api_url(),
        };

        let proxy_file = fc.proxy.unwrap_or_default();
        let proxy = match env("TELEGRAM_PROXY").or(proxy_file.url) {
            Some(raw) => Some(ProxyConfig {
                url: parse_url("proxy", &raw)?,
                username: env("TELEGRAM_PROXY_USER").or(proxy_file.username),
                password: env("TELEGRAM_PROXY_PASSWORD")
                    .or(proxy_file.password)
                    .map(SecretString::from),
            }),
            None => None,
        };

        let timeout = env("TELEGRAM_POLL_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or_else(|| fc.polling.timeout_secs.map(u64::from))
            .map_or(DEFAULT_POLL_TIMEOUT, Duration::from_secs);

        let limit = env("TELEGRAM_POLL_LIMIT")
            .and_then(|s| s.parse::<u8>().ok())
            .or(fc.polling.limit)
            .unwrap_or(DEFAULT_POLL_LIMIT)
            .clamp(1, 100);

        let defaults = BackoffPolicy::default();
        let backoff = BackoffPolicy {
            base_delay: fc
                .polling
                .backoff_base_ms
                .map_or(defaults.base_delay, Duration::from_millis),
            max_delay: fc
                .polling
                .backoff_max_ms
                .map_or(defaults.max_delay, Duration::from_millis),
            max_retries: fc.polling.max_retries,
        };

        Ok(Self {
            token: SecretString::from(token),
            api_url,
            proxy,
            request_timeout: fc
                .http
                .request_timeout_secs
                .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs),
            long_poll_margin: fc
                .http
                .long_poll_margin_secs
                .map_or(DEFAULT_LONG_POLL_MARGIN, Duration::from_secs),
            polling: PollingConfig {
                timeout,
                limit,
                allowed_updates: fc.polling.allowed_updates,
                backoff,
            },
        })
    }

    /// Numeric bot id, the part of the token before the colon
    #[must_use]
    pub fn bot_id(&self) -> Option<i64> {
        self.token
            .expose_secret()
            .split_once(':')
            .and_then(|(id, _)| id.parse().ok())
    }
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!("default API URL is valid"))
}

fn parse_url(what: &str, raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|e| Error::Config(format!("invalid {what} `{raw}`: {e}")))
}
