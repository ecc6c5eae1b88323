use crate::{Context, Result};
use std::fmt::Debug;
use std::time::Duration;

/// SigningCredential is the trait used by signer as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is usable for signing.
    fn is_valid(&self) -> bool;
}

/// ProvideCredential is the trait used by signer to obtain the credential
/// for one outbound request.
///
/// Implementations are called once per attempt. Returning `Ok(None)` means no
/// credential has been configured.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Provide a credential for the next request.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// SignRequest is the trait used by signer to attach authentication to a request.
#[async_trait::async_trait]
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this builder.
    type Credential: Send + Sync + Unpin + 'static;

    /// Sign the request in place.
    ///
    /// ## Body
    ///
    /// `body` MUST be the exact bytes that will be transmitted. Signers that
    /// bind the payload digest into their token hash these bytes as-is.
    ///
    /// ## Expires In
    ///
    /// The `expires_in` parameter overrides the validity window of the produced
    /// token. `None` selects the signer's default.
    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut http::request::Parts,
        body: &[u8],
        credential: &Self::Credential,
        expires_in: Option<Duration>,
    ) -> Result<()>;
}
