use thiserror::Error;

/// Error type for token operations.
///
/// The verification variants stay distinct for logging. Callers facing
/// clients must collapse them into a single "unauthorized" outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,
}
