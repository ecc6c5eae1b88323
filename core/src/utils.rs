//! Utility functions and types.

use std::fmt::{Debug, Display};

/// Redacts a string by replacing all but the first and last three characters with asterisks.
///
/// - If the input string has fewer than 12 characters, it should be entirely redacted.
/// - If the input string has 12 or more characters, only the first three and the last three.
///
/// This allows users to tell key ids and bearer tokens apart in logs without
/// leaking them.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.len();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 || !self.0.is_char_boundary(3) || !self.0.is_char_boundary(length - 3)
        {
            f.write_str("***")
        } else {
            f.write_str(&self.0[..3])?;
            f.write_str("***")?;
            f.write_str(&self.0[length - 3..])
        }
    }
}

impl Display for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Short", "***"; "short")]
    #[test_case("3394eb8831ff50634ad973cda5b93fc0b36bd885", "339***885"; "key id")]
    #[test_case("Bearer eyJhbGciOiJFUzI1NiJ9.e30.sig", "Bea***sig"; "bearer")]
    #[test_case("", "EMPTY"; "empty")]
    #[test_case("HelloWorld", "***"; "under twelve")]
    fn test_redact(input: &str, expected: &str) {
        assert_eq!(format!("{:?}", Redact(input)), expected);
        assert_eq!(format!("{}", Redact(input)), expected);
    }
}
