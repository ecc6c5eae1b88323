use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The error type for wallet transport operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    api: Option<ApiError>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No credentials available, or invalid configuration values
    ConfigInvalid,

    /// Credentials could not be retrieved or are empty
    CredentialInvalid,

    /// Private key is malformed, unsupported, or signing failed
    KeyInvalid,

    /// Request cannot be built (serialization, header values, uri)
    RequestInvalid,

    /// Network or timeout failure before a response was obtained
    Transport,

    /// The service answered with a non-success status
    Api,

    /// The caller cancelled the operation
    Cancelled,

    /// Unexpected errors (undecodable responses, internal failures)
    Unexpected,
}

/// Structured error returned by the service for a non-success response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// HTTP status code of the response.
    #[serde(default)]
    pub status_code: u16,
    /// Stable machine readable code, for example `ErrInvalidParameter`.
    #[serde(default)]
    pub code: String,
    /// Human readable detail.
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            api: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Structured service error, present when kind is [`ErrorKind::Api`].
    pub fn api_error(&self) -> Option<&ApiError> {
        self.api.as_ref()
    }

    /// HTTP status code of the failed response, if any.
    pub fn status_code(&self) -> Option<u16> {
        self.api.as_ref().map(|v| v.status_code)
    }

    /// Check if this is a credential or key error
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::CredentialInvalid | ErrorKind::KeyInvalid
        )
    }

    /// Check whether the service may succeed if the same request is sent again.
    ///
    /// Only rate limited and server side failures qualify.
    pub fn is_retryable(&self) -> bool {
        match self.status_code() {
            Some(status) => status == 429 || status >= 500,
            None => false,
        }
    }
}

// Convenience constructors
impl Error {
    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a credential invalid error
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a key invalid error
    pub fn key_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a cancelled error
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Create an error from a classified service response.
    ///
    /// The message of the service error becomes the message of this error.
    pub fn api(err: ApiError) -> Self {
        Self {
            kind: ErrorKind::Api,
            message: err.message.clone(),
            api: Some(err),
            source: None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::KeyInvalid => write!(f, "invalid private key"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Transport => write!(f, "transport failure"),
            ErrorKind::Api => write!(f, "api error"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_api_error_carries_status_and_message() {
        let err = Error::api(ApiError {
            status_code: 404,
            code: "ErrMissingResource".to_string(),
            message: "account not found".to_string(),
        });

        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.to_string(), "account not found");
        assert_eq!(err.api_error().unwrap().code, "ErrMissingResource");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_statuses() {
        for (status, expected) in [(429, true), (500, true), (503, true), (400, false)] {
            let err = Error::api(ApiError {
                status_code: status,
                ..Default::default()
            });
            assert_eq!(err.is_retryable(), expected, "status {status}");
        }
        assert!(!Error::transport("connection reset").is_retryable());
    }

    #[test]
    fn test_http_errors_are_request_invalid() {
        let err = Error::from(http::HeaderValue::from_str("bad\nvalue").unwrap_err());
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);

        let err = Error::from(
            http::Request::post("https://example.com")
                .header("bad header", "v")
                .body(())
                .unwrap_err(),
        );
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_api_error_decodes_wire_format() {
        let err: ApiError = serde_json::from_str(
            r#"{"statusCode":400,"code":"ErrInvalidParameter","message":"bad accountId"}"#,
        )
        .unwrap();

        assert_eq!(
            err,
            ApiError {
                status_code: 400,
                code: "ErrInvalidParameter".to_string(),
                message: "bad accountId".to_string(),
            }
        );
    }
}
