use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Middleware that validates bearer tokens and adds the identity to request extensions.
///
/// Every rejection produces the same response; the reason is only logged.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req).map_err(|reason| {
        tracing::warn!(reason, "Request rejected");
        ApiError::unauthorized().into_response()
    })?;

    let user = state.user_service.authorize(token).await.map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        ApiError::unauthorized().into_response()
    })?;

    tracing::debug!(user_id = %user.user_id, "Request authenticated");
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, &'static str> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or("missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Authorization header is not valid ASCII")?;

    auth_str
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or("Authorization header is not a bearer token")
}
