use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::debug;
use p256::pkcs8::DecodePrivateKey as _;
use p256::pkcs8::EncodePrivateKey as _;
use rsa::pkcs1::{DecodeRsaPrivateKey as _, EncodeRsaPrivateKey as _};
use rsa::pkcs8::DecodePrivateKey as _;
use rsa::traits::PublicKeyParts as _;
use std::fmt::{self, Debug};

use halogen_wallet_core::{Error, Result};

use crate::constants::{MIN_RSA_KEY_BITS, TOKEN_TYPE};
use crate::Claims;

/// PrivateKey is a parsed signing key.
///
/// The variant is picked from the key itself and decides the algorithm of
/// every token it signs.
pub enum PrivateKey {
    /// P-256 key, signs with ES256.
    Es256(EncodingKey),
    /// RSA key, signs with RS256.
    Rs256(EncodingKey),
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKey").field(&self.algorithm()).finish()
    }
}

impl PrivateKey {
    /// Parse a PEM encoded private key.
    ///
    /// Accepted encodings are P-256 in PKCS#8 or SEC1 form and RSA (2048 bits
    /// or more) in PKCS#8 or PKCS#1 form.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let pem = std::str::from_utf8(pem)
            .map_err(|e| Error::key_invalid("private key is not valid PEM text").with_source(e))?;

        let ec = p256::SecretKey::from_pkcs8_pem(pem)
            .or_else(|_| p256::SecretKey::from_sec1_pem(pem));
        if let Ok(key) = ec {
            let der = key
                .to_pkcs8_der()
                .map_err(|e| Error::key_invalid(format!("failed to encode P-256 key: {e}")))?;
            return Ok(PrivateKey::Es256(EncodingKey::from_ec_der(der.as_bytes())));
        }

        let key = rsa::RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| rsa::RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|_| {
                Error::key_invalid(
                    "unsupported or malformed private key: expected a PEM encoded P-256 or RSA key",
                )
            })?;
        let bits = key.size() * 8;
        if bits < MIN_RSA_KEY_BITS {
            return Err(Error::key_invalid(format!(
                "RSA key of {bits} bits is too small, at least {MIN_RSA_KEY_BITS} bits required"
            )));
        }

        let der = key
            .to_pkcs1_der()
            .map_err(|e| Error::key_invalid(format!("failed to encode RSA key: {e}")))?;
        Ok(PrivateKey::Rs256(EncodingKey::from_rsa_der(der.as_bytes())))
    }

    /// Algorithm selected by this key.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            PrivateKey::Es256(_) => Algorithm::ES256,
            PrivateKey::Rs256(_) => Algorithm::RS256,
        }
    }

    /// Sign `claims` into a compact token: `header.claims.signature`, each
    /// part base64url encoded without padding.
    pub fn sign_token(&self, claims: &Claims) -> Result<String> {
        let (PrivateKey::Es256(key) | PrivateKey::Rs256(key)) = self;

        let mut header = Header::new(self.algorithm());
        header.typ = Some(TOKEN_TYPE.to_string());
        let token = jsonwebtoken::encode(&header, claims, key).map_err(|e| {
            Error::key_invalid(format!("failed to sign token with {:?}", self.algorithm()))
                .with_source(e)
        })?;

        debug!("signed token with {:?}", self.algorithm());
        Ok(token)
    }
}

/// Verify a token signed with one of the fixture keys under `testdata/`.
#[cfg(test)]
pub(crate) fn verify_test_token(token: &str) -> (Header, Claims) {
    use jsonwebtoken::{DecodingKey, Validation};
    use p256::pkcs8::{EncodePublicKey as _, LineEnding};
    use rsa::pkcs1::EncodeRsaPublicKey as _;

    let header = jsonwebtoken::decode_header(token).unwrap();
    let key = match header.alg {
        Algorithm::ES256 => {
            let secret =
                p256::SecretKey::from_pkcs8_pem(include_str!("../testdata/ec_pkcs8.pem")).unwrap();
            let pem = secret.public_key().to_public_key_pem(LineEnding::LF).unwrap();
            DecodingKey::from_ec_pem(pem.as_bytes()).unwrap()
        }
        Algorithm::RS256 => {
            let secret =
                rsa::RsaPrivateKey::from_pkcs1_pem(include_str!("../testdata/rsa_pkcs1.pem"))
                    .unwrap();
            let pem = secret
                .to_public_key()
                .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
                .unwrap();
            DecodingKey::from_rsa_pem(pem.as_bytes()).unwrap()
        }
        other => panic!("unexpected algorithm {other:?}"),
    };

    let mut validation = Validation::new(header.alg);
    validation.validate_aud = false;
    let data = jsonwebtoken::decode::<Claims>(token, &key, &validation).unwrap();
    (data.header, data.claims)
}
