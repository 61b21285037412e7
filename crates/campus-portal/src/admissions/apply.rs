use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::backend::{AdmissionsBackend, BackendError, Session};
use super::domain::{
    is_offered, ApplicantDetails, ApplicantField, ApplicationRecord, ApplicationSubmission,
    Certificate,
};
use super::notice::{Notice, NoticeTone, NoticeView, NOTICE_TTL};

pub const SUBMITTED_FALLBACK: &str = "Application submitted successfully!";
pub const SUBMISSION_FAILED_FALLBACK: &str = "An error occurred while submitting the form.";

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Please fill out the {} field.", .0.label())]
    Incomplete(ApplicantField),
    #[error("Please attach your scanned certificate.")]
    MissingCertificate,
    #[error("'{0}' is not one of the offered courses.")]
    UnknownCourse(String),
    /// The backend refused the submission or could not be reached.
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: BackendError,
    },
}

impl SubmissionError {
    /// Local validation failures issue no request.
    pub fn is_local(&self) -> bool {
        !matches!(self, SubmissionError::Rejected { .. })
    }
}

/// State behind the "Apply Now" page: the applicant's inputs, the latest application
/// listing, and the confirmation notice.
#[derive(Debug)]
pub struct ApplicationForm<B> {
    backend: Arc<B>,
    details: ApplicantDetails,
    certificate: Option<Certificate>,
    applications: Vec<ApplicationRecord>,
    notice: Notice,
}

impl<B> ApplicationForm<B>
where
    B: AdmissionsBackend + 'static,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_notice_ttl(backend, NOTICE_TTL)
    }

    pub fn with_notice_ttl(backend: Arc<B>, ttl: Duration) -> Self {
        Self {
            backend,
            details: ApplicantDetails::default(),
            certificate: None,
            applications: Vec::new(),
            notice: Notice::new(ttl),
        }
    }

    /// Initial listing load.
    pub async fn mount(&mut self) {
        self.refresh_applications().await;
    }

    pub fn set_field(&mut self, field: ApplicantField, value: impl Into<String>) {
        self.details.set(field, value.into());
    }

    pub fn attach_certificate(&mut self, certificate: Certificate) {
        self.certificate = Some(certificate);
    }

    pub fn clear_certificate(&mut self) {
        self.certificate = None;
    }

    pub fn values(&self) -> &ApplicantDetails {
        &self.details
    }

    pub fn certificate(&self) -> Option<&Certificate> {
        self.certificate.as_ref()
    }

    pub fn applications(&self) -> &[ApplicationRecord] {
        &self.applications
    }

    pub fn notice(&self) -> Option<NoticeView> {
        self.notice.current()
    }

    pub fn notice_ttl(&self) -> Duration {
        self.notice.ttl()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice.dismiss();
    }

    fn validate(&self) -> Result<ApplicationSubmission, SubmissionError> {
        if let Some(field) = self.details.first_missing() {
            return Err(SubmissionError::Incomplete(field));
        }
        if !is_offered(&self.details.course) {
            return Err(SubmissionError::UnknownCourse(self.details.course.clone()));
        }
        let certificate = self
            .certificate
            .clone()
            .ok_or(SubmissionError::MissingCertificate)?;

        Ok(ApplicationSubmission {
            details: self.details.clone(),
            certificate,
        })
    }

    /// Sends the application. On success the form is cleared and the listing refreshed
    /// once the backend has answered; on failure the inputs are kept for another attempt.
    /// Either way the returned message is also shown as the notice.
    pub async fn submit(&mut self) -> Result<String, SubmissionError> {
        let submission = self.validate()?;

        match self.backend.send_application(&submission).await {
            Ok(reply) => {
                let message = reply
                    .message
                    .unwrap_or_else(|| SUBMITTED_FALLBACK.to_string());
                info!(course = %submission.details.course, "application submitted");

                self.notice.show(message.clone(), NoticeTone::Success);
                self.details = ApplicantDetails::default();
                self.certificate = None;
                self.refresh_applications().await;
                Ok(message)
            }
            Err(source) => {
                let message = source
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| SUBMISSION_FAILED_FALLBACK.to_string());
                warn!(error = %source, "application submission failed");

                self.notice.show(message.clone(), NoticeTone::Failure);
                Err(SubmissionError::Rejected { message, source })
            }
        }
    }

    /// Reloads the listing. Failures are logged and keep the previous listing.
    pub async fn refresh_applications(&mut self) {
        match self.backend.fetch_applications(&Session::anonymous()).await {
            Ok(records) => self.applications = records,
            Err(err) => warn!(error = %err, "unable to refresh application listing"),
        }
    }
}
