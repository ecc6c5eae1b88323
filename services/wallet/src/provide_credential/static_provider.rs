use log::debug;
use std::sync::{Arc, PoisonError, RwLock};

use halogen_wallet_core::{Context, ProvideCredential, Result};

use crate::Credential;

/// StaticCredentialProvider keeps a credential in memory for the lifetime of
/// the client.
///
/// Clones share the same storage, so a credential set through one handle is
/// visible to every signer holding another. Each request receives its own
/// copy, which is wiped once the request is signed.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialProvider {
    credential: Arc<RwLock<Option<Credential>>>,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider with no credential set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new StaticCredentialProvider holding the given credential.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Arc::new(RwLock::new(Some(credential))),
        }
    }

    /// Replace the stored credential.
    pub fn set_credential(&self, credential: Credential) {
        let mut guard = self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(credential);
    }
}

#[async_trait::async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        let cred = self
            .credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if cred.is_none() {
            debug!("no static credential has been set");
        }
        Ok(cred)
    }
}
