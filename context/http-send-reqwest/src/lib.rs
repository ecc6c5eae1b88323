//! [`HttpSend`] implementation backed by a pooled [`reqwest::Client`].

use async_trait::async_trait;
use bytes::Bytes;
use halogen_wallet_core::{Error, HttpSend, Result};
use log::debug;
use reqwest::{Client, Request};

/// ReqwestHttpSend sends requests through a shared `reqwest::Client`.
///
/// The client keeps its connection pool and TLS sessions across calls and is
/// safe to share between concurrent requests.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req).map_err(|e| {
            Error::request_invalid("failed to convert request for reqwest").with_source(e)
        })?;
        debug!("sending {} {}", req.method(), req.url());

        let resp = self.client.execute(req).await.map_err(|e| {
            Error::transport(format!("failed to send request: {e}")).with_source(e)
        })?;

        let mut builder = http::Response::builder()
            .status(resp.status())
            .version(resp.version());
        if let Some(headers) = builder.headers_mut() {
            *headers = resp.headers().clone();
        }
        let bs = resp.bytes().await.map_err(|e| {
            Error::transport(format!("failed to read response body: {e}")).with_source(e)
        })?;

        Ok(builder.body(bs)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halogen_wallet_core::{Context, ErrorKind};

    #[tokio::test]
    async fn test_http_send_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/query")
            .match_body(r#"{"name":"ping","payload":{}}"#)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("x-request-id", "abc")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
        let req = http::Request::post(format!("{}/query", server.url()))
            .body(Bytes::from_static(br#"{"name":"ping","payload":{}}"#))
            .unwrap();

        let resp = ctx.http_send(req).await.unwrap();
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(resp.headers()["x-request-id"], "abc");
        assert_eq!(resp.body().as_ref(), br#"{"ok":true}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_send_connection_refused_is_transport_error() {
        let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
        let req = http::Request::post("http://127.0.0.1:1/query")
            .body(Bytes::new())
            .unwrap();

        let err = ctx.http_send(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
