use std::fmt;

/// Route is the logical endpoint an operation is sent to.
///
/// The route is carried in the request extensions so the signer can bind it
/// into the token regardless of any base path in the configured endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Read operations, `POST /query`.
    Query,
    /// State mutating operations, `POST /command`.
    Command,
}

impl Route {
    /// Path of the route, also used as the `uri` claim.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Query => "/query",
            Route::Command => "/command",
        }
    }

    /// Whether a failed request on this route may be sent again after an
    /// ambiguous server error.
    ///
    /// Commands are never resent on 5xx: the first attempt may already have
    /// been executed.
    pub fn retries_server_errors(&self) -> bool {
        matches!(self, Route::Query)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
