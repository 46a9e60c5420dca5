use std::fmt;

/// Query parameter carrying the token on protected routes.
pub const CSRF_TOKEN_PARAM: &str = "_csrf_token";

/// A CSRF token. `Debug` output is redacted so tokens stay out of logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Create a token from an existing string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a supplied value without short-circuiting on the
    /// first differing byte.
    pub fn matches(&self, supplied: &str) -> bool {
        let expected = self.0.as_bytes();
        let supplied = supplied.as_bytes();
        if expected.len() != supplied.len() {
            return false;
        }
        expected
            .iter()
            .zip(supplied)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CsrfToken").field(&"***").finish()
    }
}

impl fmt::Display for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let token = CsrfToken::new("super-secret");
        assert_eq!(format!("{:?}", token), "CsrfToken(\"***\")");
        assert_eq!(token.to_string(), "super-secret");
    }

    #[test]
    fn test_matches() {
        let token = CsrfToken::new("abc123");
        assert!(token.matches("abc123"));
        assert!(!token.matches("abc124"));
        assert!(!token.matches("abc"));
        assert!(!token.matches(""));
    }
}
