//! Machine readable error codes returned by the wallet service.

use std::fmt;

use halogen_wallet_core::ApiError;

/// Category an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Authentication and authorization failures.
    Authentication,
    /// The request was malformed or missing data.
    RequestValidation,
    /// Certificate signing request problems.
    CertificateSigningRequest,
    /// Unknown routes and missing or duplicated resources.
    ResourceRouting,
    /// The request violates a business rule.
    BusinessRule,
    /// Rate limiting and cancellations.
    RateLimiting,
    /// Server and third party failures.
    Infrastructure,
    /// A code this client does not know about.
    Unknown,
}

macro_rules! error_codes {
    ($($(#[$doc:meta])* $variant:ident => $code:literal, $category:ident;)*) => {
        /// Error code taxonomy of the wallet service.
        ///
        /// Codes unknown to this client are kept verbatim in [`ErrorCode::Other`].
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum ErrorCode {
            $($(#[$doc])* $variant,)*
            /// A code not listed above.
            Other(String),
        }

        impl ErrorCode {
            /// The code as sent on the wire.
            pub fn as_str(&self) -> &str {
                match self {
                    $(ErrorCode::$variant => $code,)*
                    ErrorCode::Other(v) => v,
                }
            }

            /// The category of this code.
            pub fn category(&self) -> ErrorCategory {
                match self {
                    $(ErrorCode::$variant => ErrorCategory::$category,)*
                    ErrorCode::Other(_) => ErrorCategory::Unknown,
                }
            }
        }

        impl From<&str> for ErrorCode {
            fn from(v: &str) -> Self {
                match v {
                    $($code => ErrorCode::$variant,)*
                    other => ErrorCode::Other(other.to_string()),
                }
            }
        }
    };
}

error_codes! {
    /// The API key used in the request has expired.
    ExpiredApiKey => "ErrExpiredApiKey", Authentication;
    /// The authentication token has expired.
    ExpiredAuthToken => "ErrExpiredAuthToken", Authentication;
    /// The client lacks permission for this action.
    InsufficientAccess => "ErrInsufficientAccess", Authentication;
    /// The request signature could not be verified.
    InvalidAuthSignature => "ErrInvalidAuthSignature", Authentication;
    /// The authentication token is malformed.
    InvalidAuthToken => "ErrInvalidAuthToken", Authentication;
    /// The registered public key is invalid.
    InvalidPublicKey => "ErrInvalidPublicKey", Authentication;
    /// The caller's IP address is not allowed.
    UnauthorizedIpAddress => "ErrUnauthorizedIPAddress", Authentication;

    /// The operation name is unknown.
    InvalidApiName => "ErrInvalidApiName", RequestValidation;
    /// The body is not in the expected format.
    InvalidBodyFormat => "ErrInvalidBodyFormat", RequestValidation;
    /// The date range is not consistent.
    InvalidDateRange => "ErrInvalidDateRange", RequestValidation;
    /// A header is invalid.
    InvalidHeader => "ErrInvalidHeader", RequestValidation;
    /// The HTTP method is not supported.
    InvalidMethod => "ErrInvalidMethod", RequestValidation;
    /// A parameter is invalid.
    InvalidParameter => "ErrInvalidParameter", RequestValidation;
    /// The payload does not meet the API requirements.
    InvalidPayload => "ErrInvalidPayload", RequestValidation;
    /// A required header is missing.
    MissingHeader => "ErrMissingHeader", RequestValidation;
    /// A required parameter is missing.
    MissingParameter => "ErrMissingParameter", RequestValidation;

    /// The CSR cannot be parsed.
    InvalidCsr => "ErrInvalidCSR", CertificateSigningRequest;
    /// The CSR format is not recognized.
    InvalidCsrFormat => "ErrInvalidCSRFormat", CertificateSigningRequest;
    /// The CSR uses an unsupported curve.
    InvalidCsrEllipticCurve => "ErrInvalidCSREllipticCurve", CertificateSigningRequest;
    /// The CSR key is too short.
    InvalidCsrKeyLength => "ErrInvalidCSRKeyLength", CertificateSigningRequest;
    /// The CSR key type is unsupported.
    InvalidCsrKeyType => "ErrInvalidCSRKeyType", CertificateSigningRequest;
    /// The CSR signature is invalid.
    InvalidCsrSignature => "ErrInvalidCSRSignature", CertificateSigningRequest;

    /// The resource already exists.
    AlreadyExists => "ErrAlreadyExists", ResourceRouting;
    /// The route is not recognized.
    InvalidRoute => "ErrInvalidRoute", ResourceRouting;
    /// The resource does not exist.
    MissingResource => "ErrMissingResource", ResourceRouting;

    /// The account type does not allow this action.
    ActionNotAllowedForAccountType => "ErrActionNotAllowedForAccountType", BusinessRule;
    /// The action is only allowed during fund hours.
    ActionOutsideFundHours => "ErrActionOutsideFundHours", BusinessRule;
    /// A DuitNow payment failed.
    DuitNow => "ErrDuitNow", BusinessRule;
    /// The account balance is insufficient.
    InsufficientBalance => "ErrInsufficientBalance", BusinessRule;
    /// The account experience does not allow this action.
    InvalidAccountExperience => "ErrInvalidAccountExperience", BusinessRule;
    /// The request violates a policy.
    InvalidRequestPolicy => "ErrInvalidRequestPolicy", BusinessRule;
    /// The request can no longer be cancelled.
    RequestCannotBeCancelled => "ErrRequestCannotBeCancelled", BusinessRule;
    /// Account creation needs a suitability assessment.
    SuitabilityAssessmentMissingForAccountCreation => "ErrSuitabilityAssessmentMissingForAccountCreation", BusinessRule;
    /// A suitability assessment is required first.
    SuitabilityAssessmentRequired => "ErrSuitabilityAssessmentRequired", BusinessRule;

    /// The request was cancelled before completion.
    CancelledRequest => "ErrCancelledRequest", RateLimiting;
    /// Too many requests.
    RateLimitExceeded => "ErrRateLimitExceeded", RateLimiting;

    /// Unexpected server failure.
    Internal => "ErrInternal", Infrastructure;
    /// A third party service is unavailable.
    ServiceUnavailable => "ErrServiceUnavailable", Infrastructure;
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access the typed [`ErrorCode`] of a service error.
pub trait ApiErrorExt {
    /// Parse the wire code into an [`ErrorCode`].
    fn error_code(&self) -> ErrorCode;
}

impl ApiErrorExt for ApiError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::from(self.code.as_str())
    }
}
