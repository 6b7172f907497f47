use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
/// Health checks always use this timeout, regardless of configuration.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for the [`APIClient`](crate::APIClient), resolved once at
/// startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without a trailing slash, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Per-request transport timeout.
    pub timeout: Duration,
    /// Retry budget handed to the request hooks.
    pub retry_attempts: u32,
    /// Base delay for exponential backoff.
    pub retry_delay: Duration,
    /// Sent as `X-Client-Version` on every request.
    pub client_version: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ClientConfig {
    /// Read configuration from the process environment.
    ///
    /// Recognized variables:
    /// - API_BASE_URL: backend origin (default http://localhost:8000)
    /// - API_TIMEOUT_MS: request timeout in milliseconds (default 30000)
    /// - API_RETRY_ATTEMPTS: hook-level retry budget (default 3)
    /// - API_RETRY_DELAY_MS: base backoff delay in milliseconds (default 1000)
    /// - CLIENT_VERSION: value of the X-Client-Version header
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Missing keys use
    /// the defaults; unparseable numbers are logged and replaced by the
    /// default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_url = lookup("API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.base_url);

        let timeout = parse_or(&lookup, "API_TIMEOUT_MS", DEFAULT_TIMEOUT_MS);
        let retry_attempts =
            parse_or(&lookup, "API_RETRY_ATTEMPTS", DEFAULT_RETRY_ATTEMPTS);
        let retry_delay =
            parse_or(&lookup, "API_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS);

        Self {
            base_url,
            timeout: Duration::from_millis(timeout),
            retry_attempts,
            retry_delay: Duration::from_millis(retry_delay),
            client_version: lookup("CLIENT_VERSION")
                .unwrap_or(defaults.client_version),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

fn parse_or<T: std::str::FromStr + std::fmt::Display + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid value {raw:?} for {key}, using default {default}"
            );
            default
        }),
    }
}
