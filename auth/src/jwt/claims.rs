use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Lifetime of every issued access token.
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Token lifetime as a duration.
pub fn token_ttl() -> Duration {
    Duration::seconds(TOKEN_TTL_SECONDS)
}

/// Identity asserted by a token.
///
/// Produced by a successful verification and handed to protected operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User identifier
    pub subject: String,
    pub username: String,
}

impl Identity {
    pub fn new(subject: impl ToString, username: impl ToString) -> Self {
        Self {
            subject: subject.to_string(),
            username: username.to_string(),
        }
    }
}

/// Signed token payload.
///
/// Standard RFC 7519 `sub`, `iat` and `exp` claims plus the username.
/// Every field is required; a token missing one is malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an identity, valid for [`TOKEN_TTL_SECONDS`] from `now`.
    pub fn for_identity(identity: &Identity, now: DateTime<Utc>) -> Self {
        let issued_at = now.timestamp();

        Self {
            sub: identity.subject.clone(),
            username: identity.username.clone(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECONDS,
        }
    }

    /// Check if token is expired.
    ///
    /// A token is no longer valid from its expiration second onwards.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    pub fn identity(&self) -> Identity {
        Identity::new(&self.sub, &self.username)
    }
}

/// An issued, signed access token together with its decoded claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Compact serialisation presented by clients as a bearer token
    pub token: String,
    pub subject: String,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
