//! Access guard - the role-to-path-prefix authorization middleware.
//!
//! Runs once per request whose path sits under `/admin`, `/teacher` or
//! `/student` (the `/login` sub-paths excluded) and enforces the session
//! contract:
//!
//! 1. no cookie                      -> redirect to the prefix's login page
//! 2. cookie fails to decode         -> clear cookie, redirect to `/`
//! 3. decoded user no longer exists  -> clear cookie, redirect to `/`
//! 4. user's role != path prefix     -> redirect to `/`, cookie kept
//! 5. role matches                   -> attach context, run the handler
//!
//! The split redirect targets distinguish "you must authenticate" (login
//! page) from "you are authenticated but not authorized" (site root) and
//! must not be collapsed. Any resolution error behaves as case 3 - the
//! guard fails closed and never surfaces an error body.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::api::extractors::CurrentUser;
use crate::api::AppState;
use crate::config::{SESSION_COOKIE_NAME, SESSION_MAX_AGE_SECONDS};
use crate::domain::Role;

/// Build the session cookie set at login.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(time::Duration::seconds(SESSION_MAX_AGE_SECONDS))
        .build()
}

/// Cookie template matching the session cookie for removal: the jar
/// rewrites it with an empty value and Max-Age=0.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE_NAME).path("/").build()
}

/// Which role a path is gated on, if any. Login pages are not gated.
fn required_role(path: &str) -> Option<Role> {
    for role in [Role::Admin, Role::Teacher, Role::Student] {
        let prefix = role.path_prefix();
        let under_prefix =
            path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'));
        if !under_prefix {
            continue;
        }

        let login = role.login_path();
        let is_login =
            path == login || path.strip_prefix(login).is_some_and(|rest| rest.starts_with('/'));
        return if is_login { None } else { Some(role) };
    }
    None
}

/// Access guard middleware. See the module docs for the state machine.
pub async fn access_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    let Some(role) = required_role(path) else {
        return next.run(request).await;
    };

    let jar = CookieJar::from_headers(request.headers());
    let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
        // Case 1: nothing to check, send the visitor to this portal's login
        return Redirect::to(role.login_path()).into_response();
    };

    match state.auth_service.resolve_session(cookie.value()).await {
        Ok(user) if user.role == role => {
            // Case 5: attach the request-scoped context and continue
            request.extensions_mut().insert(CurrentUser::from(user));
            next.run(request).await
        }
        Ok(user) => {
            // Case 4: valid session, wrong portal. The cookie stays valid
            // for the user's own role-prefixed paths.
            tracing::debug!(user = %user.id, path = %path, "Session role does not match path");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            // Cases 2 and 3 (fail closed): stale or undecodable session
            tracing::debug!(error = %e, path = %path, "Clearing unusable session cookie");
            (
                jar.remove(expired_session_cookie()),
                Redirect::to("/"),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_role_matches_prefixes() {
        assert_eq!(required_role("/admin"), Some(Role::Admin));
        assert_eq!(required_role("/admin/departments"), Some(Role::Admin));
        assert_eq!(required_role("/teacher/classes"), Some(Role::Teacher));
        assert_eq!(required_role("/student/subjects/abc"), Some(Role::Student));
    }

    #[test]
    fn test_login_pages_not_gated() {
        assert_eq!(required_role("/admin/login"), None);
        assert_eq!(required_role("/teacher/login"), None);
        assert_eq!(required_role("/student/login"), None);
    }

    #[test]
    fn test_unrelated_paths_not_gated() {
        assert_eq!(required_role("/"), None);
        assert_eq!(required_role("/api/departments"), None);
        assert_eq!(required_role("/administrator"), None);
        assert_eq!(required_role("/teachers"), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("token-value".to_string(), true);
        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(
            cookie.max_age(),
            Some(time::Duration::seconds(SESSION_MAX_AGE_SECONDS))
        );
    }
}
