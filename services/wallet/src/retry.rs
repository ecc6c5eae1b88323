use http::header::RETRY_AFTER;
use http::{HeaderMap, StatusCode};
use std::time::Duration;

use crate::Route;

/// What the executor does after a non-success response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Sleep for the configured interval and send the request again.
    RetryAfterDelay(Duration),
    /// The service asked us to wait; sleep and send again without using the
    /// retry budget.
    RateLimitWait(Duration),
    /// Return the classified error to the caller.
    Terminal,
}

/// RetryState tracks the retries of one logical operation.
///
/// A new state is created per call and never shared between calls.
#[derive(Debug, Clone)]
pub struct RetryState {
    retried: usize,
    max_read_retry: usize,
    retry_interval: Duration,
}

impl RetryState {
    /// Create a new RetryState.
    ///
    /// `max_read_retry` is the total number of attempts a query may make on
    /// server errors.
    pub fn new(max_read_retry: usize, retry_interval: Duration) -> Self {
        Self {
            retried: 0,
            max_read_retry,
            retry_interval,
        }
    }

    /// Number of server error retries performed so far.
    pub fn retried(&self) -> usize {
        self.retried
    }

    /// Decide the next step for a response with `status` (>= 400) on `route`.
    pub fn next(&mut self, route: Route, status: StatusCode, headers: &HeaderMap) -> Step {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return match retry_after(headers) {
                Some(wait) => Step::RateLimitWait(wait),
                None => Step::Terminal,
            };
        }

        if status.is_server_error() && route.retries_server_errors() {
            if self.retried >= self.max_read_retry.saturating_sub(1) {
                return Step::Terminal;
            }
            self.retried += 1;
            return Step::RetryAfterDelay(self.retry_interval);
        }

        Step::Terminal
    }
}

/// Parse `Retry-After` as whole seconds.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
