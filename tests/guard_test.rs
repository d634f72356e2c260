//! Access guard integration tests.
//!
//! Drives the full router with stub services and asserts the guard's
//! state machine: login-page redirects, cookie clearing, cross-role
//! redirects that keep the cookie, and pass-through with request context.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use tower::ServiceExt;
use uuid::Uuid;

use campus_api::api::{create_router, AppState};
use campus_api::config::Config;
use campus_api::domain::{
    ClassAssignment, Course, Department, Enrollment, EnrollmentResponse, Role, SessionToken,
    StudentResponse, Subject, SubjectFileResponse, SubjectResponse, TeacherResponse, User,
};
use campus_api::errors::{AppError, AppResult};
use campus_api::services::{
    AuthService, CatalogService, EnrollmentService, FileService, NewStudent, NewTeacher,
    NewUpload, ProvisioningService, StudentUpdate, TeacherClass, TeacherUpdate,
};

const PASSWORD: &str = "CorrectHorse1";

fn seeded_users() -> Vec<User> {
    [
        ("admin@example.edu", "Site Admin", Role::Admin),
        ("ada@example.edu", "Ada Lovelace", Role::Teacher),
        ("grace@example.edu", "Grace Hopper", Role::Student),
    ]
    .into_iter()
    .map(|(email, name, role)| User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: "stub".to_string(),
        name: name.to_string(),
        role,
        created_at: Utc::now(),
    })
    .collect()
}

/// Auth stub over an in-memory user list; tokens use the real codec.
struct StubAuth {
    users: Vec<User>,
}

#[async_trait]
impl AuthService for StubAuth {
    async fn login(
        &self,
        email: String,
        password: String,
        role: Role,
    ) -> AppResult<(User, String)> {
        let user = self
            .users
            .iter()
            .find(|u| u.email == email && u.role == role)
            .cloned();

        match user {
            Some(user) if password == PASSWORD => {
                let token = SessionToken::issue(user.id).encode();
                Ok((user, token))
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn resolve_session(&self, token: &str) -> AppResult<User> {
        let decoded = SessionToken::decode(token)?;
        self.users
            .iter()
            .find(|u| u.id == decoded.user_id)
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}

/// Service stubs for routes the guard tests never reach.
struct Unreached;

fn unreached<T>() -> AppResult<T> {
    Err(AppError::internal("not exercised by guard tests"))
}

#[async_trait]
impl ProvisioningService for Unreached {
    async fn create_admin(&self, _: String, _: String, _: String) -> AppResult<User> {
        unreached()
    }
    async fn create_teacher(&self, _: NewTeacher) -> AppResult<TeacherResponse> {
        unreached()
    }
    async fn list_teachers(&self) -> AppResult<Vec<TeacherResponse>> {
        unreached()
    }
    async fn get_teacher(&self, _: Uuid) -> AppResult<TeacherResponse> {
        unreached()
    }
    async fn update_teacher(&self, _: Uuid, _: TeacherUpdate) -> AppResult<TeacherResponse> {
        unreached()
    }
    async fn delete_teacher(&self, _: Uuid) -> AppResult<()> {
        unreached()
    }
    async fn create_student(&self, _: NewStudent) -> AppResult<StudentResponse> {
        unreached()
    }
    async fn list_students(&self) -> AppResult<Vec<StudentResponse>> {
        unreached()
    }
    async fn get_student(&self, _: Uuid) -> AppResult<StudentResponse> {
        unreached()
    }
    async fn update_student(&self, _: Uuid, _: StudentUpdate) -> AppResult<StudentResponse> {
        unreached()
    }
    async fn delete_student(&self, _: Uuid) -> AppResult<()> {
        unreached()
    }
}

#[async_trait]
impl CatalogService for Unreached {
    async fn create_department(&self, _: String, _: String) -> AppResult<Department> {
        unreached()
    }
    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        unreached()
    }
    async fn get_department(&self, _: Uuid) -> AppResult<Department> {
        unreached()
    }
    async fn update_department(
        &self,
        _: Uuid,
        _: Option<String>,
        _: Option<String>,
    ) -> AppResult<Department> {
        unreached()
    }
    async fn delete_department(&self, _: Uuid) -> AppResult<()> {
        unreached()
    }
    async fn create_course(&self, _: String, _: String, _: Uuid) -> AppResult<Course> {
        unreached()
    }
    async fn list_courses(&self, _: Option<Uuid>) -> AppResult<Vec<Course>> {
        unreached()
    }
    async fn get_course(&self, _: Uuid) -> AppResult<Course> {
        unreached()
    }
    async fn update_course(
        &self,
        _: Uuid,
        _: Option<String>,
        _: Option<String>,
        _: Option<Uuid>,
    ) -> AppResult<Course> {
        unreached()
    }
    async fn delete_course(&self, _: Uuid) -> AppResult<()> {
        unreached()
    }
    async fn create_subject(&self, _: String, _: String, _: Uuid) -> AppResult<Subject> {
        unreached()
    }
    async fn list_subjects(&self, _: Option<Uuid>) -> AppResult<Vec<Subject>> {
        unreached()
    }
    async fn get_subject(&self, _: Uuid) -> AppResult<SubjectResponse> {
        unreached()
    }
    async fn update_subject(
        &self,
        _: Uuid,
        _: Option<String>,
        _: Option<String>,
    ) -> AppResult<Subject> {
        unreached()
    }
    async fn delete_subject(&self, _: Uuid) -> AppResult<()> {
        unreached()
    }
    async fn assign_teacher(&self, _: Uuid, _: Uuid) -> AppResult<ClassAssignment> {
        unreached()
    }
    async fn unassign_teacher(&self, _: Uuid, _: Uuid) -> AppResult<()> {
        unreached()
    }
    async fn classes_for_teacher(&self, _: Uuid) -> AppResult<Vec<TeacherClass>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl EnrollmentService for Unreached {
    async fn reconcile(&self, _: Uuid, _: Vec<Uuid>) -> AppResult<Vec<Enrollment>> {
        unreached()
    }
    async fn list(&self, _: Option<Uuid>, _: Option<Uuid>) -> AppResult<Vec<Enrollment>> {
        unreached()
    }
    async fn delete(&self, _: Uuid) -> AppResult<()> {
        unreached()
    }
    async fn subjects_for_student(&self, _: Uuid) -> AppResult<Vec<EnrollmentResponse>> {
        Ok(Vec::new())
    }
    async fn roster(&self, _: Uuid) -> AppResult<Vec<StudentResponse>> {
        unreached()
    }
    async fn is_enrolled(&self, _: Uuid, _: Uuid) -> AppResult<bool> {
        unreached()
    }
}

#[async_trait]
impl FileService for Unreached {
    async fn upload(&self, _: NewUpload) -> AppResult<SubjectFileResponse> {
        unreached()
    }
    async fn list(&self, _: Option<Uuid>) -> AppResult<Vec<SubjectFileResponse>> {
        unreached()
    }
    async fn get(&self, _: Uuid) -> AppResult<SubjectFileResponse> {
        unreached()
    }
    async fn delete(&self, _: Uuid) -> AppResult<()> {
        unreached()
    }
}

fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        cookie_secure: false,
        upload_dir: "uploads".to_string(),
    }
}

fn test_app(users: Vec<User>) -> Router {
    let state = AppState::new(
        Arc::new(StubAuth { users }),
        Arc::new(Unreached),
        Arc::new(Unreached),
        Arc::new(Unreached),
        Arc::new(Unreached),
        test_config(),
    );
    create_router(state)
}

fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
}

fn set_cookie<'a>(response: &'a axum::response::Response) -> Option<&'a str> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap())
}

fn session_cookie_for(user: &User) -> String {
    format!("session-token={}", SessionToken::issue(user.id).encode())
}

#[tokio::test]
async fn test_no_cookie_redirects_to_role_login() {
    let app = test_app(seeded_users());

    for (path, login) in [
        ("/admin/profile", "/admin/login"),
        ("/teacher/classes", "/teacher/login"),
        ("/student/subjects", "/student/login"),
    ] {
        let response = app.clone().oneshot(get(path, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(location(&response), login);
        assert!(set_cookie(&response).is_none(), "no cookie to clear");
    }
}

#[tokio::test]
async fn test_login_pages_are_reachable_without_a_session() {
    let app = test_app(seeded_users());

    for path in ["/admin/login", "/teacher/login", "/student/login"] {
        let response = app.clone().oneshot(get(path, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", path);
    }
}

#[tokio::test]
async fn test_undecodable_cookie_is_cleared_and_redirected_home() {
    let app = test_app(seeded_users());

    let response = app
        .oneshot(get("/admin/profile", Some("session-token=garbage")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let cleared = set_cookie(&response).expect("cookie must be cleared");
    assert!(cleared.starts_with("session-token="));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_stale_user_cookie_is_cleared_and_redirected_home() {
    let app = test_app(seeded_users());

    // Decodable token for a user that no longer exists
    let ghost = SessionToken::issue(Uuid::new_v4()).encode();
    let response = app
        .oneshot(get(
            "/student/subjects",
            Some(&format!("session-token={}", ghost)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn test_wrong_role_redirects_home_without_clearing_the_cookie() {
    let users = seeded_users();
    let student = users.iter().find(|u| u.role == Role::Student).unwrap();
    let cookie = session_cookie_for(student);
    let app = test_app(users.clone());

    // A student session on the admin portal: sent home, cookie untouched
    let response = app
        .clone()
        .oneshot(get("/admin/profile", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(
        set_cookie(&response).is_none(),
        "cookie must stay valid for the student's own portal"
    );

    // The same cookie still works under /student
    let response = app
        .oneshot(get("/student/profile", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_matching_role_attaches_request_context() {
    let users = seeded_users();
    let teacher = users.iter().find(|u| u.role == Role::Teacher).unwrap();
    let cookie = session_cookie_for(teacher);
    let teacher_name = teacher.name.clone();
    let app = test_app(users);

    let response = app
        .oneshot(get("/teacher/profile", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["name"], teacher_name);
    assert_eq!(json["role"], "teacher");
}

#[tokio::test]
async fn test_api_routes_are_not_intercepted_by_the_guard() {
    let app = test_app(seeded_users());

    // No redirect: the API answers 401 directly
    let response = app.oneshot(get("/api/auth/me", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_sets_the_session_cookie_the_guard_accepts() {
    let users = seeded_users();
    let app = test_app(users);

    let body = serde_json::json!({
        "email": "grace@example.edu",
        "password": PASSWORD,
        "role": "student",
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response).expect("login must set the session cookie").to_string();
    assert!(cookie.starts_with("session-token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Max-Age=604800"));

    // The cookie the login handed out passes the guard
    let pair = cookie.split(';').next().unwrap().to_string();
    let response = app
        .clone()
        .oneshot(get("/student/profile", Some(&pair)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // And resolves on the API side too
    let response = app.oneshot(get("/api/auth/me", Some(&pair))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_are_generic() {
    let app = test_app(seeded_users());

    // Wrong password and wrong-role portal produce the same error shape
    for (email, role) in [("grace@example.edu", "admin"), ("nobody@example.edu", "student")] {
        let body = serde_json::json!({
            "email": email,
            "password": PASSWORD,
            "role": role,
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Invalid credentials");
    }
}

#[tokio::test]
async fn test_malformed_login_payload_is_rejected_before_any_lookup() {
    let app = test_app(seeded_users());

    let body = serde_json::json!({
        "email": "not-an-email",
        "password": PASSWORD,
        "role": "student",
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"], "Invalid email format");
}

#[tokio::test]
async fn test_logout_clears_the_cookie() {
    let app = test_app(seeded_users());

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
}
