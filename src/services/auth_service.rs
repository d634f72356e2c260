//! Authentication service - login and session resolution.
//!
//! There is no server-side session state: the encoded token in the cookie
//! is the only session artifact, so logout is purely client-side cookie
//! clearing and no revocation path exists.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{password::DUMMY_HASH, Password, Role, SessionToken, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify email + password + claimed role; on success return the user
    /// and a freshly minted session token.
    ///
    /// Every failure mode (unknown email, wrong role, wrong password)
    /// collapses into the one generic `InvalidCredentials`.
    async fn login(&self, email: String, password: String, role: Role)
        -> AppResult<(User, String)>;

    /// Resolve a session token back to its user.
    async fn resolve_session(&self, token: &str) -> AppResult<User>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(
        &self,
        email: String,
        password: String,
        role: Role,
    ) -> AppResult<(User, String)> {
        // A user can only authenticate against the portal of the role they
        // hold; the lookup is by the exact (email, role) pair.
        let user_result = self.uow.users().find_by_email_and_role(&email, role).await?;

        // Verify against a dummy hash when the lookup missed so a miss costs
        // the same as a wrong password (no user enumeration via timing).
        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (DUMMY_HASH, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let user = user_result.ok_or(AppError::InvalidCredentials)?;
        let token = SessionToken::issue(user.id).encode();

        tracing::info!(user = %user.id, role = %user.role, "Login succeeded");

        Ok((user, token))
    }

    async fn resolve_session(&self, token: &str) -> AppResult<User> {
        let decoded = SessionToken::decode(token)?;

        self.uow
            .users()
            .find_by_id(decoded.user_id)
            .await?
            .ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::infra::MockUserRepository;
    use crate::services::test_support::TestUow;

    fn user_with_password(role: Role, plain: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.edu".to_string(),
            password_hash: Password::new(plain).unwrap().into_string(),
            name: "Ada Lovelace".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn uow_with_users(users: MockUserRepository) -> Arc<TestUow> {
        Arc::new(TestUow {
            users: Arc::new(users),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_login_success_returns_decodable_token() {
        let user = user_with_password(Role::Teacher, "CorrectHorse1");
        let expected_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email_and_role()
            .returning(move |_, _| Ok(Some(user.clone())));

        let auth = Authenticator::new(uow_with_users(users));
        let (logged_in, token) = auth
            .login(
                "ada@example.edu".to_string(),
                "CorrectHorse1".to_string(),
                Role::Teacher,
            )
            .await
            .unwrap();

        assert_eq!(logged_in.id, expected_id);
        assert_eq!(SessionToken::decode(&token).unwrap().user_id, expected_id);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_generic() {
        let user = user_with_password(Role::Teacher, "CorrectHorse1");

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email_and_role()
            .returning(move |_, _| Ok(Some(user.clone())));

        let auth = Authenticator::new(uow_with_users(users));
        let result = auth
            .login(
                "ada@example.edu".to_string(),
                "WrongPassword1".to_string(),
                Role::Teacher,
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_role_pair_is_generic() {
        let mut users = MockUserRepository::new();
        // Wrong-role logins miss the (email, role) lookup just like
        // unknown emails do
        users
            .expect_find_by_email_and_role()
            .returning(|_, _| Ok(None));

        let auth = Authenticator::new(uow_with_users(users));
        let result = auth
            .login(
                "ada@example.edu".to_string(),
                "CorrectHorse1".to_string(),
                Role::Admin,
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_resolve_session_round_trip() {
        let user = user_with_password(Role::Student, "CorrectHorse1");
        let token = SessionToken::issue(user.id).encode();
        let expected_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = Authenticator::new(uow_with_users(users));
        let resolved = auth.resolve_session(&token).await.unwrap();
        assert_eq!(resolved.id, expected_id);
    }

    #[tokio::test]
    async fn test_resolve_session_stale_user() {
        let token = SessionToken::issue(Uuid::new_v4()).encode();

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let auth = Authenticator::new(uow_with_users(users));
        let result = auth.resolve_session(&token).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_resolve_session_malformed_token_skips_lookup() {
        // No find_by_id expectation: a store hit would panic the test
        let auth = Authenticator::new(Arc::new(TestUow::default()));
        let result = auth.resolve_session("not-a-token").await;
        assert!(matches!(result, Err(AppError::MalformedToken)));
    }
}
