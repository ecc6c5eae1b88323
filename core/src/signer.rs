use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use std::sync::Arc;
use std::time::Duration;

/// Signer is the main struct used to sign the request.
///
/// Unlike a caching signer, every call to [`Signer::sign`] asks the provider
/// for a credential and drops it once the request is signed. Providers that
/// keep credentials around do so on their own.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,
            loader: Arc::new(loader),
            builder: Arc::new(builder),
        }
    }

    /// The context this signer was built with.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Signing request.
    ///
    /// `body` must be the exact bytes sent along with `req`.
    pub async fn sign(
        &self,
        req: &mut http::request::Parts,
        body: &[u8],
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let cred = self.loader.provide_credential(&self.ctx).await?.ok_or_else(|| {
            Error::config_invalid(
                "credentials are not set: either set credentials on the client or provide a credential loader",
            )
        })?;
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "credential is missing key id or private key",
            ));
        }

        self.builder
            .sign_request(&self.ctx, req, body, &cred, expires_in)
            .await
        // `cred` is dropped here; credential types wipe their secrets on drop.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug)]
    struct TestCredential(String);

    impl SigningCredential for TestCredential {
        fn is_valid(&self) -> bool {
            !self.0.is_empty()
        }
    }

    #[derive(Debug, Default)]
    struct CountingProvider {
        value: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl ProvideCredential for CountingProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.value.clone().map(TestCredential))
        }
    }

    #[derive(Debug)]
    struct HeaderBuilder;

    #[async_trait::async_trait]
    impl SignRequest for HeaderBuilder {
        type Credential = TestCredential;

        async fn sign_request(
            &self,
            _: &Context,
            req: &mut http::request::Parts,
            body: &[u8],
            cred: &Self::Credential,
            _: Option<Duration>,
        ) -> Result<()> {
            let value = format!("{}:{}", cred.0, body.len());
            req.headers.insert("x-test-auth", value.parse()?);
            Ok(())
        }
    }

    fn parts() -> http::request::Parts {
        http::Request::post("https://example.com/query")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn test_sign_loads_credential_every_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(
            Context::new(),
            CountingProvider {
                value: Some("key".to_string()),
                calls: calls.clone(),
            },
            HeaderBuilder,
        );

        for _ in 0..3 {
            let mut req = parts();
            signer.sign(&mut req, b"{}", None).await.unwrap();
            assert_eq!(req.headers["x-test-auth"], "key:2");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_sign_without_credential_is_config_error() {
        let signer = Signer::new(Context::new(), CountingProvider::default(), HeaderBuilder);

        let err = signer.sign(&mut parts(), b"{}", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[tokio::test]
    async fn test_sign_with_empty_credential_is_credential_error() {
        let signer = Signer::new(
            Context::new(),
            CountingProvider {
                value: Some(String::new()),
                ..Default::default()
            },
            HeaderBuilder,
        );

        let err = signer.sign(&mut parts(), b"{}", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }
}
