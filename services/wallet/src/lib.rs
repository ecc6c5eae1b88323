//! Halogen Wallet API client.
//!
//! Every request is sent as `POST /query` or `POST /command` with a JSON body
//! `{"name": <operation>, "payload": <request>}` and a bearer token signed with
//! the caller's private key. The token binds the key id, the route, a digest of
//! the exact body bytes and a freshness window. P-256 keys sign with ES256,
//! RSA keys with RS256.
//!
//! Queries that fail with a server error are retried up to
//! [`Config::max_read_retry`] attempts. Rate limited requests wait for the
//! `Retry-After` delay and are sent again without using that budget. Commands
//! are never resent after a server error.
//!
//! ## Example
//!
//! ```no_run
//! use halogen_wallet::{Client, Config, Credential};
//! use serde_json::{json, Value};
//!
//! # async fn example() -> halogen_wallet::Result<()> {
//! let client = Client::new(Config::default()).with_credential_loader(|| {
//!     let pem = std::fs::read("wallet.pem")?;
//!     Ok(Credential::new("my-key-id", pem))
//! });
//!
//! let accounts: Value = client.query("list_client_accounts", &json!({})).await?;
//! # Ok(())
//! # }
//! ```

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::{LoaderCredentialProvider, StaticCredentialProvider};

mod claims;
pub use claims::Claims;

mod key;
pub use jsonwebtoken::Algorithm;
pub use key::PrivateKey;

mod route;
pub use route::Route;

mod sign_request;
pub use sign_request::RequestSigner;

mod retry;
pub use retry::{RetryState, Step};

mod classify;
pub use classify::classify;

mod error_code;
pub use error_code::{ApiErrorExt, ErrorCategory, ErrorCode};

mod client;
pub use client::Client;

pub use halogen_wallet_core::{ApiError, Context, Error, ErrorKind, Result};
