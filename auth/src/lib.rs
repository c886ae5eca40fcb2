//! Authentication utilities library
//!
//! Provides the credential primitives used by the identity service:
//! - Password hashing (Argon2id, tunable work factor)
//! - Signed, time-bounded access tokens (HS256)
//! - Authentication coordination with uniform failure behaviour
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{Identity, TokenHandler};
//! use chrono::Utc;
//!
//! let handler = TokenHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let now = Utc::now();
//! let issued = handler.issue(&Identity::new("user123", "alice"), now).unwrap();
//! let identity = handler.verify(&issued.token, now).unwrap();
//! assert_eq!(identity.username, "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Identity, WorkFactor};
//! use chrono::Utc;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", WorkFactor::default()).unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let identity = Identity::new("user123", "alice");
//! let token = auth.authenticate("password123", Some(&hash), &identity, Utc::now()).unwrap();
//!
//! // Validate token
//! let decoded = auth.validate_token(&token.token, Utc::now()).unwrap();
//! assert_eq!(decoded, identity);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::token_ttl;
pub use jwt::AccessToken;
pub use jwt::Claims;
pub use jwt::Identity;
pub use jwt::TokenError;
pub use jwt::TokenHandler;
pub use jwt::TOKEN_TTL_SECONDS;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::WorkFactor;
