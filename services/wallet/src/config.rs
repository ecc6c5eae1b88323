use log::warn;
use std::str::FromStr;
use std::time::Duration;

use halogen_wallet_core::Context;

use crate::constants::*;

/// Config carries all the configuration for the wallet client.
///
/// Zero values fall back to their defaults when the client is built, so a
/// partially filled config is always usable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the wallet API, without the route.
    ///
    /// Default to `https://external-api.wallet.halogen.my`.
    pub endpoint: String,
    /// Timeout of each attempt, covering signing, sending and reading the
    /// response.
    pub timeout: Duration,
    /// Maximum number of attempts for a query failing with server errors.
    pub max_read_retry: usize,
    /// Sleep between query attempts on server errors.
    pub retry_interval: Duration,
    /// Dump requests and responses to the log at info level.
    ///
    /// The `Authorization` header is always redacted.
    pub debug: bool,
    /// Validity of each signed token.
    pub token_validity: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_read_retry: DEFAULT_MAX_READ_RETRY,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            debug: false,
            token_validity: DEFAULT_TOKEN_VALIDITY,
        }
    }
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the per attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of query attempts on server errors.
    pub fn with_max_read_retry(mut self, max_read_retry: usize) -> Self {
        self.max_read_retry = max_read_retry;
        self
    }

    /// Set the sleep between query retries.
    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Enable or disable request and response dumps.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the validity of signed tokens.
    pub fn with_token_validity(mut self, token_validity: Duration) -> Self {
        self.token_validity = token_validity;
        self
    }

    /// Load config from environment variables.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn from_env(ctx: &Context) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = ctx.env_var(HALOGEN_WALLET_ENDPOINT) {
            cfg.endpoint = v;
        }

        if let Some(v) = parse_env::<u64>(ctx, HALOGEN_WALLET_TIMEOUT_SECS) {
            cfg.timeout = Duration::from_secs(v);
        }

        if let Some(v) = parse_env::<usize>(ctx, HALOGEN_WALLET_MAX_READ_RETRY) {
            cfg.max_read_retry = v;
        }

        if let Some(v) = parse_env::<u64>(ctx, HALOGEN_WALLET_RETRY_INTERVAL_MS) {
            cfg.retry_interval = Duration::from_millis(v);
        }

        if let Some(v) = ctx.env_var(HALOGEN_WALLET_DEBUG) {
            cfg.debug = matches!(v.to_lowercase().as_str(), "true" | "1" | "on");
        }

        cfg
    }

    /// Replace zero values with defaults and strip trailing slashes from the
    /// endpoint.
    pub(crate) fn normalized(mut self) -> Self {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        self.endpoint = if endpoint.is_empty() {
            DEFAULT_ENDPOINT.to_string()
        } else {
            endpoint.to_string()
        };
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_TIMEOUT;
        }
        if self.max_read_retry == 0 {
            self.max_read_retry = DEFAULT_MAX_READ_RETRY;
        }
        if self.retry_interval.is_zero() {
            self.retry_interval = DEFAULT_RETRY_INTERVAL;
        }
        if self.token_validity.is_zero() {
            self.token_validity = DEFAULT_TOKEN_VALIDITY;
        }
        self
    }
}

fn parse_env<T: FromStr>(ctx: &Context, key: &str) -> Option<T> {
    let v = ctx.env_var(key)?;
    match v.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring invalid value {v:?} of {key}");
            None
        }
    }
}
