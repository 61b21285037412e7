use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::backend::{AdmissionsBackend, BackendError, Session};
use super::domain::Credentials;
use crate::site::Page;

pub const LOGIN_FAILED_FALLBACK: &str = "Login failed. Please try again.";
pub const SERVER_ERROR_FALLBACK: &str = "An error occurred. Please try again.";

/// Messages shown under the login form. `Display` is the user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("Please enter both email and password.")]
    MissingCredentials,
    /// 2xx reply without the success sentinel.
    #[error("{0}")]
    Rejected(String),
    #[error("Endpoint not found. Please check the API URL.")]
    EndpointNotFound,
    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,
    #[error("{0}")]
    Server(String),
    #[error("Network error. Please ensure the backend is running.")]
    Network,
}

impl LoginError {
    fn from_backend(error: &BackendError) -> Self {
        match error {
            BackendError::Status { status: 404, .. } => LoginError::EndpointNotFound,
            BackendError::Status { status: 403, .. } => LoginError::InvalidCredentials,
            BackendError::Status { message, .. } => LoginError::Server(
                message
                    .clone()
                    .unwrap_or_else(|| SERVER_ERROR_FALLBACK.to_string()),
            ),
            BackendError::Transport { .. } | BackendError::Request { .. } => LoginError::Network,
        }
    }
}

/// Where the browser goes after a successful login, and the session cookies to set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: Page,
    pub set_cookies: Vec<String>,
}

/// Read side of the login button: disabled with a progress label while a request is out.
#[derive(Debug, Clone, Default)]
pub struct SubmitControl {
    busy: Arc<AtomicBool>,
}

impl SubmitControl {
    pub const IDLE_LABEL: &'static str = "Log In";
    pub const BUSY_LABEL: &'static str = "Logging in...";

    pub fn is_disabled(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn label(&self) -> &'static str {
        if self.is_disabled() {
            Self::BUSY_LABEL
        } else {
            Self::IDLE_LABEL
        }
    }
}

/// Clears the busy flag however the request ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct LoginForm<B> {
    backend: Arc<B>,
    credentials: Credentials,
    error: Option<LoginError>,
    control: SubmitControl,
}

impl<B> LoginForm<B>
where
    B: AdmissionsBackend + 'static,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            credentials: Credentials::default(),
            error: None,
            control: SubmitControl::default(),
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.credentials.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.credentials.password = password.into();
    }

    pub fn email(&self) -> &str {
        &self.credentials.email
    }

    pub fn error(&self) -> Option<&LoginError> {
        self.error.as_ref()
    }

    pub fn submit_control(&self) -> SubmitControl {
        self.control.clone()
    }

    /// Authenticates against the backend. The error is also kept for rendering until
    /// the next attempt.
    pub async fn submit(&mut self, session: &Session) -> Result<Navigation, LoginError> {
        self.error = None;
        let result = self.authenticate(session).await;
        self.error = result.as_ref().err().cloned();
        result
    }

    async fn authenticate(&self, session: &Session) -> Result<Navigation, LoginError> {
        if !self.credentials.is_complete() {
            return Err(LoginError::MissingCredentials);
        }

        let _busy = BusyGuard::engage(&self.control.busy);

        match self.backend.login(&self.credentials, session).await {
            Ok(reply) if reply.is_success() => {
                info!("administrator signed in");
                Ok(Navigation {
                    to: Page::AdminPage,
                    set_cookies: reply.set_cookies,
                })
            }
            Ok(reply) => {
                warn!("login reply did not carry the success status");
                Err(LoginError::Rejected(
                    reply
                        .message
                        .unwrap_or_else(|| LOGIN_FAILED_FALLBACK.to_string()),
                ))
            }
            Err(err) => {
                warn!(error = %err, "login request failed");
                Err(LoginError::from_backend(&err))
            }
        }
    }
}
