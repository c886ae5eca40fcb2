pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::token_ttl;
pub use claims::AccessToken;
pub use claims::Claims;
pub use claims::Identity;
pub use claims::TOKEN_TTL_SECONDS;
pub use errors::TokenError;
pub use handler::TokenHandler;
