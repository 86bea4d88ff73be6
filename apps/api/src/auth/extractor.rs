use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::auth::session::{parse_authorization, resolve_session, SessionLookup};
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// The authenticated caller, resolved from the `Authorization` header.
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_authorization)
            .ok_or_else(|| AppError::Unauthorized("Token is missing".to_string()))?
            .to_string();

        match resolve_session(&state.db, &token).await? {
            SessionLookup::Valid(user) => Ok(AuthUser { user, token }),
            SessionLookup::Expired => Err(AppError::Unauthorized("Token has expired".to_string())),
            SessionLookup::Unknown => Err(AppError::Unauthorized("Invalid token".to_string())),
        }
    }
}
