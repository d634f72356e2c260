//! Authentication handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{CurrentUser, ValidatedJson};
use crate::api::middleware::{expired_session_cookie, session_cookie};
use crate::api::AppState;
use crate::domain::{Role, UserResponse};
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// Login request: the role names which portal is being entered
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "admin@example.edu")]
    pub email: String,
    /// User password
    #[schema(example = "SecurePass123!")]
    pub password: String,
    /// Portal role the credentials are claimed for
    #[schema(example = "admin")]
    pub role: Role,
}

/// Login response: the token is also set as the session cookie
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    pub user: UserResponse,
    pub token: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// Login against a role portal and receive the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let (user, token) = state
        .auth_service
        .login(payload.email, payload.password, payload.role)
        .await?;

    let jar = jar.add(session_cookie(token.clone(), state.config.cookie_secure));

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user: UserResponse::from(user),
            token,
        }),
    ))
}

/// Clear the session cookie. There is no server-side session state, so
/// this is the whole logout.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.remove(expired_session_cookie()),
        Json(MessageResponse::new("Logged out")),
    )
}

/// Current user resolved from the session cookie
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUser),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn me(user: CurrentUser) -> Json<CurrentUser> {
    Json(user)
}
