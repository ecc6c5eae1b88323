use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::HeaderMap;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Write as _;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use halogen_wallet_core::utils::Redact;
use halogen_wallet_core::{Context, Error, OsEnv, ProvideCredential, Result, Signer};
use halogen_wallet_http_send_reqwest::ReqwestHttpSend;

use crate::classify::classify;
use crate::constants;
use crate::retry::{RetryState, Step};
use crate::{
    Config, Credential, LoaderCredentialProvider, RequestSigner, Route,
    StaticCredentialProvider,
};

/// Body of every wallet request.
#[derive(Serialize)]
struct Envelope<'a, I: ?Sized> {
    name: &'a str,
    payload: &'a I,
}

/// Client calls the wallet API with signed requests.
///
/// A client is cheap to clone and safe to share between tasks. Every call owns
/// its own retry state, credential and claims; only the HTTP transport is
/// shared.
///
/// ```no_run
/// use halogen_wallet::{Client, Config};
/// use serde_json::{json, Value};
///
/// # async fn example() -> halogen_wallet::Result<()> {
/// let client = Client::new(Config::default());
/// client.set_credentials("key-id", std::fs::read("key.pem").unwrap_or_default());
///
/// let accounts: Value = client.query("list_client_accounts", &json!({})).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    config: Arc<Config>,
    signer: Signer<Credential>,
    static_credentials: Option<StaticCredentialProvider>,
}

impl Client {
    /// Create a new client sending requests with a pooled reqwest client.
    pub fn new(config: Config) -> Self {
        let ctx = Context::new()
            .with_http_send(ReqwestHttpSend::default())
            .with_env(OsEnv);
        Self::with_context(ctx, config)
    }

    /// Create a new client configured from `HALOGEN_WALLET_*` environment
    /// variables.
    pub fn from_env() -> Self {
        let ctx = Context::new()
            .with_http_send(ReqwestHttpSend::default())
            .with_env(OsEnv);
        let config = Config::from_env(&ctx);
        Self::with_context(ctx, config)
    }

    /// Create a new client on top of the given context.
    ///
    /// Credentials are read from an in-memory holder filled by
    /// [`Client::set_credentials`].
    pub fn with_context(ctx: Context, config: Config) -> Self {
        let config = config.normalized();
        let credentials = StaticCredentialProvider::new();
        let signer = Signer::new(
            ctx,
            credentials.clone(),
            RequestSigner::new().with_validity(config.token_validity),
        );

        Self {
            config: Arc::new(config),
            signer,
            static_credentials: Some(credentials),
        }
    }

    /// Retrieve the credential through `loader` before every request.
    ///
    /// The loader takes precedence over credentials stored with
    /// [`Client::set_credentials`].
    pub fn with_credential_loader<F>(self, loader: F) -> Self
    where
        F: Fn() -> anyhow::Result<Credential> + Send + Sync + 'static,
    {
        self.with_credential_provider(LoaderCredentialProvider::new(loader))
    }

    /// Retrieve credentials from a custom provider.
    pub fn with_credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        let ctx = self.signer.context().clone();
        self.signer = Signer::new(
            ctx,
            provider,
            RequestSigner::new().with_validity(self.config.token_validity),
        );
        self.static_credentials = None;
        self
    }

    /// Store the credentials used to sign requests.
    ///
    /// Does nothing when a credential loader is configured.
    pub fn set_credentials(&self, key_id: impl Into<String>, private_key: impl Into<Vec<u8>>) {
        match &self.static_credentials {
            Some(credentials) => credentials.set_credential(Credential::new(key_id, private_key)),
            None => {
                if self.config.debug {
                    info!("credential loader is configured, set_credentials is ignored");
                }
            }
        }
    }

    /// The effective config of this client.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Invoke a read operation.
    ///
    /// Server errors are retried up to `max_read_retry` attempts.
    pub async fn query<I, O>(&self, name: &str, payload: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.invoke(Route::Query, name, payload, &CancellationToken::new())
            .await
    }

    /// Invoke a state mutating operation.
    ///
    /// Commands are only sent again after a rate limit response, never after
    /// a server error.
    pub async fn command<I, O>(&self, name: &str, payload: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.invoke(Route::Command, name, payload, &CancellationToken::new())
            .await
    }

    /// Same as [`Client::query`], aborting with [`ErrorKind::Cancelled`] once
    /// `cancel` fires.
    ///
    /// [`ErrorKind::Cancelled`]: halogen_wallet_core::ErrorKind::Cancelled
    pub async fn query_with_cancel<I, O>(
        &self,
        name: &str,
        payload: &I,
        cancel: &CancellationToken,
    ) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.invoke(Route::Query, name, payload, cancel).await
    }

    /// Same as [`Client::command`], aborting with [`ErrorKind::Cancelled`]
    /// once `cancel` fires.
    ///
    /// [`ErrorKind::Cancelled`]: halogen_wallet_core::ErrorKind::Cancelled
    pub async fn command_with_cancel<I, O>(
        &self,
        name: &str,
        payload: &I,
        cancel: &CancellationToken,
    ) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.invoke(Route::Command, name, payload, cancel).await
    }

    async fn invoke<I, O>(
        &self,
        route: Route,
        name: &str,
        payload: &I,
        cancel: &CancellationToken,
    ) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        // Serialized once: the same bytes are hashed and sent on every attempt.
        let body = serde_json::to_vec(&Envelope { name, payload }).map_err(|e| {
            Error::request_invalid(format!("failed to serialize {name}")).with_source(e)
        })?;
        let body = Bytes::from(body);

        let mut state = RetryState::new(self.config.max_read_retry, self.config.retry_interval);
        loop {
            let resp = cancellable(cancel, self.send(route, body.clone())).await?;
            let status = resp.status();
            if status.as_u16() < 400 {
                debug!("{route} {name} succeeded with {status}");
                return decode_output(name, resp.body());
            }

            match state.next(route, status, resp.headers()) {
                Step::RetryAfterDelay(delay) => {
                    warn!(
                        "{route} {name} failed with {status}, retry {}/{} in {delay:?}",
                        state.retried(),
                        self.config.max_read_retry - 1
                    );
                    cancellable(cancel, sleep(delay)).await?;
                }
                Step::RateLimitWait(delay) => {
                    warn!("{route} {name} is rate limited, waiting {delay:?}");
                    cancellable(cancel, sleep(delay)).await?;
                }
                Step::Terminal => {
                    let err = classify(&resp);
                    debug!(
                        "{route} {name} failed with {status} after {} retries: {}",
                        state.retried(),
                        err.code
                    );
                    return Err(Error::api(err));
                }
            }
        }
    }

    /// Run one attempt: build, sign and send the request.
    async fn send(&self, route: Route, body: Bytes) -> Result<http::Response<Bytes>> {
        let attempt = async {
            let (mut parts, ()) = http::Request::post(format!(
                "{}{}",
                self.config.endpoint,
                route.path()
            ))
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, constants::USER_AGENT)
            .extension(route)
            .body(())?
            .into_parts();

            self.signer.sign(&mut parts, &body, None).await?;

            if self.config.debug {
                info!(
                    "request: {} {}\n{}\n{}",
                    parts.method,
                    parts.uri,
                    dump_headers(&parts.headers),
                    String::from_utf8_lossy(&body)
                );
            }

            let resp = self
                .signer
                .context()
                .http_send(http::Request::from_parts(parts, body))
                .await?;

            if self.config.debug {
                info!(
                    "response: {}\n{}\n{}",
                    resp.status(),
                    dump_headers(resp.headers()),
                    String::from_utf8_lossy(resp.body())
                );
            }
            Ok::<_, Error>(resp)
        };

        tokio::time::timeout(self.config.timeout, attempt)
            .await
            .map_err(|_| {
                Error::transport(format!(
                    "{route} request timed out after {:?}",
                    self.config.timeout
                ))
            })?
    }
}

async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::cancelled("operation cancelled by caller")),
        res = fut => res,
    }
}

async fn sleep(delay: Duration) -> Result<()> {
    tokio::time::sleep(delay).await;
    Ok(())
}

fn decode_output<O: DeserializeOwned>(name: &str, body: &[u8]) -> Result<O> {
    let body = if body.is_empty() { b"null".as_slice() } else { body };
    serde_json::from_slice(body).map_err(|e| {
        Error::unexpected(format!("failed to decode response of {name}")).with_source(e)
    })
}

fn dump_headers(headers: &HeaderMap) -> String {
    let mut s = String::new();
    for (name, value) in headers {
        let value = value.to_str().unwrap_or("<binary>");
        if name == AUTHORIZATION {
            let _ = writeln!(s, "{name}: {}", Redact::from(value));
        } else {
            let _ = writeln!(s, "{name}: {value}");
        }
    }
    s
}
