use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::user::models::AuthenticatedUser;

/// Echo the identity resolved by the authentication middleware.
pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiSuccess<MeResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        MeResponseData {
            user: IdentityData {
                id: user.user_id.to_string(),
                username: user.username,
            },
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub user: IdentityData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityData {
    pub id: String,
    pub username: String,
}
