//! Time related utils.

use chrono::Utc;

/// DateTime is the alias of `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a new DateTime with current time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Seconds since unix epoch, as used by token claims.
pub fn unix_timestamp(t: DateTime) -> i64 {
    t.timestamp()
}
