use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Decoded token payload.
///
/// A token asserts exactly one thing: an email address, bounded in time by
/// `iat`/`exp` (Unix timestamps in seconds).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Build claims for `email`, issued now and expiring `ttl` from now.
    pub fn issued_now(email: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_now_sets_window() {
        let claims = Claims::issued_now("user@example.com", Duration::seconds(30));

        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.exp - claims.iat, 30);
    }

    #[test]
    fn test_negative_ttl_expires_in_the_past() {
        let claims = Claims::issued_now("user@example.com", Duration::seconds(-60));
        assert!(claims.exp < Utc::now().timestamp());
    }
}
