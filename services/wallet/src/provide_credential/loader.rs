use log::debug;
use std::fmt::{self, Debug};
use std::sync::Arc;

use halogen_wallet_core::{Context, Error, ProvideCredential, Result};

use crate::Credential;

type LoadFn = dyn Fn() -> anyhow::Result<Credential> + Send + Sync;

/// LoaderCredentialProvider retrieves the credential through a caller supplied
/// function on every request.
///
/// This lets callers rotate or re-fetch keys out of band. The transport never
/// keeps the returned credential beyond the request it signs.
///
/// The function runs on the calling task; keep it fast or move blocking work
/// behind a cache of your own.
#[derive(Clone)]
pub struct LoaderCredentialProvider {
    loader: Arc<LoadFn>,
}

impl LoaderCredentialProvider {
    /// Create a new LoaderCredentialProvider.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> anyhow::Result<Credential> + Send + Sync + 'static,
    {
        Self {
            loader: Arc::new(loader),
        }
    }
}

impl Debug for LoaderCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderCredentialProvider").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ProvideCredential for LoaderCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        debug!("loading credential from credential loader");

        let cred = (self.loader)()
            .map_err(|e| Error::credential_invalid("credential loader failed").with_source(e))?;
        Ok(Some(cred))
    }
}
