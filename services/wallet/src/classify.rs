use bytes::Bytes;
use http::StatusCode;
use log::debug;

use halogen_wallet_core::ApiError;

use crate::ErrorCode;

/// Classify a non-success response into an [`ApiError`].
///
/// The body is decoded as the service's error document. When it cannot be
/// decoded the error is synthesized from the status alone, so this never
/// fails.
pub fn classify(resp: &http::Response<Bytes>) -> ApiError {
    let status = resp.status();

    match serde_json::from_slice::<ApiError>(resp.body()) {
        Ok(mut err) => {
            if err.status_code == 0 {
                err.status_code = status.as_u16();
            }
            if err.code.is_empty() {
                err.code = fallback_code(status).to_string();
            }
            if err.message.is_empty() {
                err.message = status.to_string();
            }
            err
        }
        Err(e) => {
            debug!("response body of status {status} is not an error document: {e}");
            ApiError {
                status_code: status.as_u16(),
                code: fallback_code(status).to_string(),
                message: status.to_string(),
            }
        }
    }
}

fn fallback_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ErrorCode::RateLimitExceeded.as_str(),
        StatusCode::SERVICE_UNAVAILABLE => ErrorCode::ServiceUnavailable.as_str(),
        s if s.is_server_error() => ErrorCode::Internal.as_str(),
        _ => "",
    }
}
