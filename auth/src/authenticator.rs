use chrono::DateTime;
use chrono::Utc;

use crate::jwt::AccessToken;
use crate::jwt::Identity;
use crate::jwt::TokenError;
use crate::jwt::TokenHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::WorkFactor;

/// Authentication coordinator combining password verification and token issuance.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and token handling.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_handler: TokenHandler,
    decoy_hash: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// Hashes a throwaway password so that logins for unknown users cost
    /// the same as logins for known ones.
    ///
    /// # Arguments
    /// * `token_secret` - Secret key for token signing
    /// * `work_factor` - Password hashing cost
    ///
    /// # Errors
    /// * `InvalidWorkFactor` - Work factor rejected by the hasher
    /// * `HashingFailed` - Decoy hash could not be computed
    pub fn new(token_secret: &[u8], work_factor: WorkFactor) -> Result<Self, PasswordError> {
        let password_hasher = PasswordHasher::with_work_factor(work_factor)?;
        let decoy_hash = password_hasher.hash("decoy-password-never-matches")?;

        Ok(Self {
            password_hasher,
            token_handler: TokenHandler::new(token_secret),
            decoy_hash,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue an access token.
    ///
    /// Exactly one password verification runs whether or not the user
    /// exists, and both failure causes return `InvalidCredentials`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash, `None` when no such user exists
    /// * `identity` - Identity to assert in the token
    /// * `now` - Issue time
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user or password does not match
    /// * `PasswordError` - Stored hash is unreadable
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: Option<&str>,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, AuthenticationError> {
        let is_valid = match stored_hash {
            Some(hash) => self.password_hasher.verify(password, hash)?,
            None => {
                self.password_hasher.verify(password, &self.decoy_hash)?;
                false
            }
        };

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(identity, now)?)
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, TokenError> {
        self.token_handler.issue(identity, now)
    }

    /// Validate a presented token.
    ///
    /// # Errors
    /// * `Malformed`, `InvalidSignature`, `Expired` - See [`TokenHandler::verify`]
    pub fn validate_token(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        self.token_handler.verify(token, now)
    }
}
