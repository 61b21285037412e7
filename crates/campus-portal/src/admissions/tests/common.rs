use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::admissions::backend::{
    AdmissionsBackend, BackendError, BackendReply, LoginReply, Session, GET_APPLICATIONS_PATH,
    LOGIN_PATH, SEND_APPLICATION_PATH,
};
use crate::admissions::domain::{
    records_from_listing, ApplicantField, ApplicationRecord, ApplicationSubmission, Certificate,
    Credentials,
};
use crate::admissions::ApplicationForm;

/// Request observed by [`ScriptedBackend`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Call {
    SendApplication(ApplicationSubmission),
    FetchApplications(Session),
    Login(Credentials, Session),
}

/// Canned outcome for one backend request.
#[derive(Debug, Clone)]
pub(super) enum Outcome {
    Json { body: Value, set_cookies: Vec<String> },
    Status { status: u16, body: Value },
    Refused,
}

impl Outcome {
    pub(super) fn ok(body: Value) -> Self {
        Outcome::Json {
            body,
            set_cookies: Vec::new(),
        }
    }

    pub(super) fn status(status: u16, body: Value) -> Self {
        Outcome::Status { status, body }
    }

    fn resolve(self, endpoint: &str) -> Result<(Value, Vec<String>), BackendError> {
        match self {
            Outcome::Json { body, set_cookies } => Ok((body, set_cookies)),
            Outcome::Status { status, body } => Err(BackendError::Status {
                endpoint: endpoint.to_string(),
                status,
                message: crate::admissions::backend::message_from(&body),
            }),
            Outcome::Refused => Err(BackendError::Transport {
                endpoint: endpoint.to_string(),
                source: Box::new(std::io::Error::from(
                    std::io::ErrorKind::ConnectionRefused,
                )),
            }),
        }
    }
}

#[derive(Default)]
pub(super) struct ScriptedBackend {
    calls: Mutex<Vec<Call>>,
    send_outcomes: Mutex<VecDeque<Outcome>>,
    listing_outcomes: Mutex<VecDeque<Outcome>>,
    login_outcomes: Mutex<VecDeque<Outcome>>,
    login_gate: Option<Arc<Notify>>,
}

impl ScriptedBackend {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Login requests wait for `gate` before answering.
    pub(super) fn with_login_gate(gate: Arc<Notify>) -> Self {
        Self {
            login_gate: Some(gate),
            ..Self::default()
        }
    }

    pub(super) fn on_send(self, outcome: Outcome) -> Self {
        self.send_outcomes
            .lock()
            .expect("outcome mutex poisoned")
            .push_back(outcome);
        self
    }

    pub(super) fn on_listing(self, outcome: Outcome) -> Self {
        self.listing_outcomes
            .lock()
            .expect("outcome mutex poisoned")
            .push_back(outcome);
        self
    }

    pub(super) fn on_login(self, outcome: Outcome) -> Self {
        self.login_outcomes
            .lock()
            .expect("outcome mutex poisoned")
            .push_back(outcome);
        self
    }

    pub(super) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("call mutex poisoned").clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("call mutex poisoned").push(call);
    }

    fn next(queue: &Mutex<VecDeque<Outcome>>, fallback: Outcome) -> Outcome {
        queue
            .lock()
            .expect("outcome mutex poisoned")
            .pop_front()
            .unwrap_or(fallback)
    }
}

#[async_trait]
impl AdmissionsBackend for ScriptedBackend {
    async fn send_application(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<BackendReply, BackendError> {
        self.record(Call::SendApplication(submission.clone()));
        let (body, _) = Self::next(&self.send_outcomes, Outcome::ok(json!({})))
            .resolve(SEND_APPLICATION_PATH)?;
        Ok(BackendReply::from_body(&body))
    }

    async fn fetch_applications(
        &self,
        session: &Session,
    ) -> Result<Vec<ApplicationRecord>, BackendError> {
        self.record(Call::FetchApplications(session.clone()));
        let (body, _) = Self::next(&self.listing_outcomes, Outcome::ok(json!([])))
            .resolve(GET_APPLICATIONS_PATH)?;
        Ok(records_from_listing(body))
    }

    async fn login(
        &self,
        credentials: &Credentials,
        session: &Session,
    ) -> Result<LoginReply, BackendError> {
        self.record(Call::Login(credentials.clone(), session.clone()));
        if let Some(gate) = &self.login_gate {
            gate.notified().await;
        }
        let (body, set_cookies) =
            Self::next(&self.login_outcomes, Outcome::status(500, json!({})))
                .resolve(LOGIN_PATH)?;
        Ok(LoginReply::from_body(&body, set_cookies))
    }
}

pub(super) fn certificate() -> Certificate {
    Certificate::new("kcse-certificate.pdf", b"%PDF-1.7 scanned".to_vec())
        .expect("pdf is allowed")
}

/// Form with every input filled in and a certificate attached.
pub(super) fn filled_form(backend: Arc<ScriptedBackend>) -> ApplicationForm<ScriptedBackend> {
    let mut form = ApplicationForm::new(backend);
    form.set_field(ApplicantField::Name, "Amina Wanjiru");
    form.set_field(ApplicantField::IdNumber, "32456789");
    form.set_field(ApplicantField::Email, "amina@example.org");
    form.set_field(ApplicantField::Phone, "0712345678");
    form.set_field(ApplicantField::Course, "Caregiver Certificate");
    form.set_field(
        ApplicantField::BriefInformation,
        "I want to train as a caregiver for elderly patients.",
    );
    form.attach_certificate(certificate());
    form
}
