use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use serde_json::Value;

use super::domain::{ApplicationRecord, ApplicationSubmission, Credentials};

pub const SEND_APPLICATION_PATH: &str = "/api/sendApplication";
pub const GET_APPLICATIONS_PATH: &str = "/api/getApplications";
pub const LOGIN_PATH: &str = "/api/login";

/// Boundary to the admissions backend that stores applications and owns sessions.
#[async_trait]
pub trait AdmissionsBackend: Send + Sync {
    /// `POST /api/sendApplication` as `multipart/form-data`.
    async fn send_application(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<BackendReply, BackendError>;

    /// `GET /api/getApplications`.
    async fn fetch_applications(
        &self,
        session: &Session,
    ) -> Result<Vec<ApplicationRecord>, BackendError>;

    /// `POST /api/login` with a JSON body, forwarding the caller's cookies.
    async fn login(
        &self,
        credentials: &Credentials,
        session: &Session,
    ) -> Result<LoginReply, BackendError>;
}

/// Body of a 2xx reply that only carries an optional human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendReply {
    pub message: Option<String>,
}

impl BackendReply {
    pub fn from_body(body: &Value) -> Self {
        Self {
            message: message_from(body),
        }
    }
}

/// Body and cookies of a 2xx reply from the login endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginReply {
    pub status: Option<Value>,
    pub message: Option<String>,
    /// Raw `Set-Cookie` values to hand back to the browser.
    pub set_cookies: Vec<String>,
}

impl LoginReply {
    pub fn from_body(body: &Value, set_cookies: Vec<String>) -> Self {
        Self {
            status: body.get("status").cloned(),
            message: message_from(body),
            set_cookies,
        }
    }

    /// The backend signals success in the body (`"status": 200`), independent of the HTTP status.
    pub fn is_success(&self) -> bool {
        self.status.as_ref().and_then(Value::as_f64) == Some(200.0)
    }
}

/// Non-empty string `message` field of a JSON body.
pub fn message_from(body: &Value) -> Option<String> {
    match body.get("message") {
        Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
        _ => None,
    }
}

/// Browser cookies forwarded to the backend so it can recognise an existing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    cookie_header: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_cookie_header(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            return Self::anonymous();
        }
        Self {
            cookie_header: Some(value),
        }
    }

    /// Joins every `Cookie` header of an inbound request.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let joined = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join("; ");
        Self::from_cookie_header(joined)
    }

    pub fn cookie_header(&self) -> Option<&str> {
        self.cookie_header.as_deref()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-2xx status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// No HTTP response was received.
    #[error("no response from {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("unable to build request for {endpoint}: {reason}")]
    Request { endpoint: String, reason: String },
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            BackendError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
