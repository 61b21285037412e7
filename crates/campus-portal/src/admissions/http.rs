//! reqwest-backed [`AdmissionsBackend`].
//!
//! Mirrors what a browser client would do: a non-2xx status is an error carrying the
//! body's `message`, a request that never gets a response is a transport error, and a
//! body that is not JSON is read as `null`.

use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use super::backend::{
    message_from, AdmissionsBackend, BackendError, BackendReply, LoginReply, Session,
    GET_APPLICATIONS_PATH, LOGIN_PATH, SEND_APPLICATION_PATH,
};
use super::domain::{records_from_listing, ApplicationRecord, ApplicationSubmission, Credentials};
use crate::config::BackendConfig;

/// Multipart field carrying the certificate scan.
pub const CERTIFICATE_FIELD: &str = "certification";

#[derive(Debug, Clone)]
pub struct HttpAdmissionsBackend {
    client: Client,
    config: BackendConfig,
}

struct RawReply {
    body: Value,
    set_cookies: Vec<String>,
}

impl HttpAdmissionsBackend {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .user_agent(concat!("campus-portal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| BackendError::Request {
                endpoint: config.base_url().to_string(),
                reason: format!("failed to build HTTP client: {err}"),
            })?;

        Ok(Self { client, config })
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<RawReply, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|err| BackendError::Transport {
                endpoint: path.to_string(),
                source: Box::new(err),
            })?;

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(|err| BackendError::Transport {
                endpoint: path.to_string(),
                source: Box::new(err),
            })?;
        let body = serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null);

        debug!(endpoint = path, status = status.as_u16(), "backend replied");

        if !status.is_success() {
            return Err(BackendError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
                message: message_from(&body),
            });
        }

        Ok(RawReply { body, set_cookies })
    }

    fn with_session(request: RequestBuilder, session: &Session) -> RequestBuilder {
        match session.cookie_header() {
            Some(cookies) => request.header(COOKIE, cookies),
            None => request,
        }
    }
}

fn application_form(submission: &ApplicationSubmission) -> Result<Form, BackendError> {
    let mut form = Form::new();
    for (field, value) in submission.details.text_fields() {
        form = form.text(field.wire_name(), value.to_string());
    }

    let certificate = &submission.certificate;
    let part = Part::bytes(certificate.bytes().to_vec())
        .file_name(certificate.file_name().to_string())
        .mime_str(certificate.content_type().as_ref())
        .map_err(|err| BackendError::Request {
            endpoint: SEND_APPLICATION_PATH.to_string(),
            reason: err.to_string(),
        })?;

    Ok(form.part(CERTIFICATE_FIELD, part))
}

#[async_trait]
impl AdmissionsBackend for HttpAdmissionsBackend {
    async fn send_application(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<BackendReply, BackendError> {
        let form = application_form(submission)?;
        let request = self
            .client
            .post(self.config.endpoint(SEND_APPLICATION_PATH))
            .multipart(form);

        let reply = self.send(SEND_APPLICATION_PATH, request).await?;
        Ok(BackendReply::from_body(&reply.body))
    }

    async fn fetch_applications(
        &self,
        session: &Session,
    ) -> Result<Vec<ApplicationRecord>, BackendError> {
        let request = Self::with_session(
            self.client.get(self.config.endpoint(GET_APPLICATIONS_PATH)),
            session,
        );

        let reply = self.send(GET_APPLICATIONS_PATH, request).await?;
        Ok(records_from_listing(reply.body))
    }

    async fn login(
        &self,
        credentials: &Credentials,
        session: &Session,
    ) -> Result<LoginReply, BackendError> {
        let request = Self::with_session(
            self.client
                .post(self.config.endpoint(LOGIN_PATH))
                .json(credentials),
            session,
        );

        let reply = self.send(LOGIN_PATH, request).await?;
        Ok(LoginReply::from_body(&reply.body, reply.set_cookies))
    }
}
