//! Session extractor - resolves the authenticated user for API routes.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::AppState;
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{Role, User};
use crate::errors::AppError;

/// Authenticated user context: id, role and display name, plus the email
/// for `/api/auth/me`.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Require admin role.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    require_role(user, Role::Admin)
}

/// Require a specific role; admins pass every check.
pub fn require_role(user: &CurrentUser, required: Role) -> Result<(), AppError> {
    if user.role == required || user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Unauthenticated)
    }
}

/// Extractor: the guard's request context when it already ran (portal
/// routes), otherwise a fresh cookie resolution (API routes, which the
/// guard's path matcher does not cover).
#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .ok_or(AppError::Unauthenticated)?;

        let user = state.auth_service.resolve_session(&token).await?;
        Ok(CurrentUser::from(user))
    }
}
