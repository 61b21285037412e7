use super::common::*;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Notify;

use crate::admissions::backend::Session;
use crate::admissions::domain::Credentials;
use crate::admissions::{LoginError, LoginForm, SubmitControl};
use crate::site::Page;

fn form_with(
    backend: Arc<ScriptedBackend>,
    email: &str,
    password: &str,
) -> LoginForm<ScriptedBackend> {
    let mut form = LoginForm::new(backend);
    form.set_email(email);
    form.set_password(password);
    form
}

#[tokio::test]
async fn empty_password_is_rejected_locally() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut form = form_with(backend.clone(), "registrar@example.org", "");

    let err = form
        .submit(&Session::anonymous())
        .await
        .expect_err("password required");
    assert_eq!(err, LoginError::MissingCredentials);
    assert_eq!(err.to_string(), "Please enter both email and password.");
    assert_eq!(form.error(), Some(&LoginError::MissingCredentials));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn success_sentinel_navigates_to_admin_page() {
    let backend = Arc::new(ScriptedBackend::new().on_login(Outcome::Json {
        body: json!({ "status": 200, "message": "Welcome" }),
        set_cookies: vec!["sid=abc123; HttpOnly; Path=/".to_string()],
    }));
    let mut form = form_with(backend.clone(), "registrar@example.org", "s3cret");
    let session = Session::from_cookie_header("theme=dark");

    let navigation = form.submit(&session).await.expect("login succeeds");
    assert_eq!(navigation.to, Page::AdminPage);
    assert_eq!(navigation.to.path(), "/adminPage");
    assert_eq!(navigation.set_cookies, vec!["sid=abc123; HttpOnly; Path=/"]);
    assert!(form.error().is_none());

    assert_eq!(
        backend.calls(),
        vec![Call::Login(
            Credentials {
                email: "registrar@example.org".to_string(),
                password: "s3cret".to_string(),
            },
            session,
        )]
    );
}

#[tokio::test]
async fn forbidden_reports_invalid_credentials_without_navigating() {
    let backend = Arc::new(
        ScriptedBackend::new().on_login(Outcome::status(403, json!({ "message": "nope" }))),
    );
    let mut form = form_with(backend, "registrar@example.org", "wrong");

    let err = form
        .submit(&Session::anonymous())
        .await
        .expect_err("forbidden");
    assert_eq!(err, LoginError::InvalidCredentials);
    assert_eq!(
        err.to_string(),
        "Invalid email or password. Please try again."
    );
}

#[tokio::test]
async fn not_found_reports_configuration_problem() {
    let backend = Arc::new(ScriptedBackend::new().on_login(Outcome::status(404, json!(null))));
    let mut form = form_with(backend, "registrar@example.org", "s3cret");

    let err = form.submit(&Session::anonymous()).await.expect_err("404");
    assert_eq!(
        err.to_string(),
        "Endpoint not found. Please check the API URL."
    );
}

#[tokio::test]
async fn other_statuses_prefer_server_message() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .on_login(Outcome::status(500, json!({ "message": "Database offline" })))
            .on_login(Outcome::status(401, json!({}))),
    );
    let mut form = form_with(backend, "registrar@example.org", "s3cret");

    let err = form.submit(&Session::anonymous()).await.expect_err("500");
    assert_eq!(err, LoginError::Server("Database offline".to_string()));

    let err = form.submit(&Session::anonymous()).await.expect_err("401");
    assert_eq!(err.to_string(), "An error occurred. Please try again.");
}

#[tokio::test]
async fn ok_reply_without_sentinel_is_a_failure() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .on_login(Outcome::ok(json!({ "status": 401, "message": "Account locked" })))
            .on_login(Outcome::ok(json!({ "status": "200" }))),
    );
    let mut form = form_with(backend, "registrar@example.org", "s3cret");

    let err = form.submit(&Session::anonymous()).await.expect_err("locked");
    assert_eq!(err, LoginError::Rejected("Account locked".to_string()));

    let err = form.submit(&Session::anonymous()).await.expect_err("string status");
    assert_eq!(err.to_string(), "Login failed. Please try again.");
}

#[tokio::test]
async fn network_error_restores_submit_control() {
    let backend = Arc::new(ScriptedBackend::new().on_login(Outcome::Refused));
    let mut form = form_with(backend, "registrar@example.org", "s3cret");
    let control = form.submit_control();

    let err = form.submit(&Session::anonymous()).await.expect_err("refused");
    assert_eq!(
        err.to_string(),
        "Network error. Please ensure the backend is running."
    );
    assert!(!control.is_disabled());
    assert_eq!(control.label(), SubmitControl::IDLE_LABEL);
}

#[tokio::test]
async fn control_is_busy_while_request_is_outstanding() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(
        ScriptedBackend::with_login_gate(gate.clone())
            .on_login(Outcome::ok(json!({ "status": 200 }))),
    );
    let mut form = form_with(backend.clone(), "registrar@example.org", "s3cret");
    let control = form.submit_control();
    assert_eq!(control.label(), "Log In");

    let pending = tokio::spawn(async move {
        let result = form.submit(&Session::anonymous()).await;
        (form, result)
    });

    while backend.calls().is_empty() {
        tokio::task::yield_now().await;
    }
    assert!(control.is_disabled());
    assert_eq!(control.label(), "Logging in...");

    gate.notify_one();
    let (form, result) = pending.await.expect("task joins");
    assert!(result.is_ok());
    assert!(!control.is_disabled());
    assert!(form.error().is_none());
}

#[tokio::test]
async fn next_attempt_clears_previous_error() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .on_login(Outcome::status(403, json!({})))
            .on_login(Outcome::ok(json!({ "status": 200 }))),
    );
    let mut form = form_with(backend, "registrar@example.org", "wrong");

    form.submit(&Session::anonymous()).await.expect_err("forbidden");
    assert!(form.error().is_some());

    form.set_password("s3cret");
    form.submit(&Session::anonymous()).await.expect("succeeds");
    assert!(form.error().is_none());
}
