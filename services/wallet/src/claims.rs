use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use halogen_wallet_core::hash::hex_sha256;
use halogen_wallet_core::time::{now, unix_timestamp};
use halogen_wallet_core::{Error, Result};

use crate::constants::{NONCE_LENGTH, TOKEN_SUBJECT};

/// Claims bound into the bearer token of one request.
///
/// A claim set is built for a single attempt and never reused: the nonce and
/// body hash are specific to the request that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Key id of the signing credential.
    pub kid: String,
    /// Fixed subject identifying the client application.
    pub sub: String,
    /// Issued at, seconds since epoch.
    pub iat: i64,
    /// Expires at, seconds since epoch.
    pub exp: i64,
    /// Hex encoded random value, unique per request.
    pub nonce: String,
    /// Hex encoded SHA-256 of the exact request body.
    #[serde(rename = "bodyHash")]
    pub body_hash: String,
    /// Route being called, `/query` or `/command`.
    pub uri: String,
}

impl Claims {
    /// Build the claims for a request to `uri` carrying `body`.
    ///
    /// `body` must be the bytes put on the wire; hashing a re-serialization
    /// would break verification on the server.
    pub fn new(key_id: &str, uri: &str, body: &[u8], validity: Duration) -> Result<Self> {
        let mut nonce = [0u8; NONCE_LENGTH];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| Error::unexpected("failed to generate token nonce").with_source(e))?;

        let iat = unix_timestamp(now());
        let validity = i64::try_from(validity.as_secs())
            .map_err(|_| Error::config_invalid("token validity is out of range"))?;

        Ok(Claims {
            kid: key_id.to_string(),
            sub: TOKEN_SUBJECT.to_string(),
            iat,
            exp: iat.saturating_add(validity),
            nonce: hex::encode(nonce),
            body_hash: hex_sha256(body),
            uri: uri.to_string(),
        })
    }
}
