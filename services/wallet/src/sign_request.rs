use http::header::{HeaderValue, AUTHORIZATION};
use log::debug;
use std::time::Duration;

use halogen_wallet_core::utils::Redact;
use halogen_wallet_core::{Context, Error, Result, SignRequest};

use crate::constants::DEFAULT_TOKEN_VALIDITY;
use crate::{Claims, Credential, PrivateKey, Route};

/// RequestSigner attaches a freshly signed bearer token to wallet requests.
///
/// The token binds the key id, the route and a digest of the body. A new token
/// with a new nonce is produced for every call, retries included.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    validity: Duration,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self {
            validity: DEFAULT_TOKEN_VALIDITY,
        }
    }
}

impl RequestSigner {
    /// Create a new RequestSigner with the default token validity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how long produced tokens stay valid.
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }
}

/// Route of the request, read from the extensions and falling back to the
/// request path.
fn request_uri(req: &http::request::Parts) -> Result<&'static str> {
    if let Some(route) = req.extensions.get::<Route>() {
        return Ok(route.path());
    }

    match req.uri.path() {
        "/query" => Ok(Route::Query.path()),
        "/command" => Ok(Route::Command.path()),
        other => Err(Error::request_invalid(format!(
            "request to {other} is not a wallet route"
        ))),
    }
}

#[async_trait::async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut http::request::Parts,
        body: &[u8],
        cred: &Self::Credential,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let uri = request_uri(req)?;
        let key = PrivateKey::from_pem(&cred.private_key)?;
        let claims = Claims::new(&cred.key_id, uri, body, expires_in.unwrap_or(self.validity))?;
        let token = key.sign_token(&claims)?;

        let mut value = HeaderValue::try_from(format!("Bearer {token}"))?;
        value.set_sensitive(true);
        req.headers.insert(AUTHORIZATION, value);

        debug!(
            "signed {uri} request with key {} using {:?}",
            Redact::from(&cred.key_id),
            key.algorithm()
        );
        Ok(())
    }
}
