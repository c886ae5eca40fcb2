use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::AccessToken;
use super::claims::Claims;
use super::claims::Identity;
use super::errors::TokenError;

/// Token handler for issuing and verifying access tokens.
///
/// Uses HS256 (HMAC with SHA-256). The secret is fixed for the lifetime of
/// the handler; there is no key rotation.
pub struct TokenHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenHandler {
    /// Create a new token handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a signed token for an identity.
    ///
    /// Pure given `now` and the secret.
    ///
    /// # Arguments
    /// * `identity` - Subject and username to assert
    /// * `now` - Issue time; expiry is `now` plus the token TTL
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<AccessToken, TokenError> {
        let claims = Claims::for_identity(identity, now);

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(AccessToken {
            token,
            issued_at: from_unix(claims.iat).ok_or_else(|| {
                TokenError::EncodingFailed("issue time out of range".to_string())
            })?,
            expires_at: from_unix(claims.exp).ok_or_else(|| {
                TokenError::EncodingFailed("expiry time out of range".to_string())
            })?,
            subject: claims.sub,
            username: claims.username,
        })
    }

    /// Verify a presented token.
    ///
    /// Checks run in order and stop at the first failure: structure, then
    /// signature (constant-time comparison), then expiry against `now`.
    ///
    /// # Arguments
    /// * `token` - Compact token string as presented by the client
    /// * `now` - Verification time
    ///
    /// # Returns
    /// Identity carried by the token
    ///
    /// # Errors
    /// * `Malformed` - Token is not a well-formed signed token
    /// * `InvalidSignature` - Signature does not match the claims under our secret
    /// * `Expired` - `now` is at or past the expiration time
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        self.check_structure(token)?;

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })?
            .claims;

        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims.identity())
    }

    /// Parse header and claims without looking at the signature.
    ///
    /// Never trust the decoded claims: they are discarded, only the
    /// parse outcome matters.
    fn check_structure(&self, token: &str) -> Result<(), TokenError> {
        let segments: Vec<&str> = token.split('.').collect();

        if segments.len() != 3 {
            return Err(TokenError::Malformed(format!(
                "expected 3 segments, got {}",
                segments.len()
            )));
        }

        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(TokenError::Malformed("empty segment".to_string()));
        }

        let mut validation = self.validation();
        validation.insecure_disable_signature_validation();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|_| ())
            .map_err(|e| TokenError::Malformed(e.to_string()))
    }

    // Expiry is checked against the caller's clock instead of the library's.
    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation
    }
}

fn from_unix(timestamp: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
}
