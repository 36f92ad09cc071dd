use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use shared::models::user::User;

use crate::{error::ApiError, state::AppState};

/// Extractor that resolves the `Authorization: Bearer <token>` header against
/// the access-token table. The token is opaque; there is nothing to verify
/// locally.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .ok_or(ApiError::Unauthorized)?
            .to_str()
            .map_err(|_| ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let user = state.auth_service.resolve_token(token).await?;
        Ok(AuthenticatedUser { user })
    }
}
