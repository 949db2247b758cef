use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// `iat` and `exp` are Unix timestamps in seconds (RFC 7519 NumericDate).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (stringified user identifier)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Audience (application name)
    pub aud: String,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Build claims issued at `now` and valid for `validity_millis`.
    ///
    /// Sub-second remainders of the validity window are dropped.
    pub fn issued_at(
        now: DateTime<Utc>,
        subject: impl ToString,
        issuer: impl ToString,
        audience: impl ToString,
        validity_millis: i64,
    ) -> Self {
        let issued_at = now.timestamp();
        let validity = Duration::milliseconds(validity_millis).num_seconds();

        Self {
            sub: subject.to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            iat: issued_at,
            exp: issued_at + validity,
        }
    }

    /// Check if the token is expired at the given timestamp.
    ///
    /// A token is no longer valid from the second of its expiration on.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_issued_at() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::issued_at(now, 42, "issuer", "app", 20_000_000);

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, "issuer");
        assert_eq!(claims.aud, "app");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_020_000);
    }

    #[test]
    fn test_sub_second_validity_is_truncated() {
        let now = Utc.timestamp_opt(1_000, 0).unwrap();
        let claims = Claims::issued_at(now, "1", "issuer", "app", 1_999);

        assert_eq!(claims.exp, 1_001);
    }

    #[test]
    fn test_is_expired() {
        let now = Utc.timestamp_opt(1_000, 0).unwrap();
        let claims = Claims::issued_at(now, "1", "issuer", "app", 10_000);

        assert!(!claims.is_expired(1_009));
        assert!(claims.is_expired(1_010)); // Exactly at expiration
        assert!(claims.is_expired(1_011));
    }
}
