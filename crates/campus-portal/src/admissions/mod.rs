//! Application intake and administrator login, as seen from the website.
//!
//! Storage and authentication belong to the external admissions backend; this module
//! owns the form state, local validation, user-facing messages, and the HTTP client
//! that talks to the backend.

pub mod apply;
pub mod backend;
pub mod domain;
pub mod http;
pub mod login;
pub mod notice;

#[cfg(test)]
mod tests;

pub use apply::{
    ApplicationForm, SubmissionError, SUBMISSION_FAILED_FALLBACK, SUBMITTED_FALLBACK,
};
pub use backend::{
    AdmissionsBackend, BackendError, BackendReply, LoginReply, Session, GET_APPLICATIONS_PATH,
    LOGIN_PATH, SEND_APPLICATION_PATH,
};
pub use domain::{
    is_offered, records_from_listing, ApplicantDetails, ApplicantField, ApplicationRecord,
    ApplicationSubmission, Certificate, CertificateKind, Credentials, UnsupportedCertificate,
    COURSE_CATALOG,
};
pub use http::{HttpAdmissionsBackend, CERTIFICATE_FIELD};
pub use login::{LoginError, LoginForm, Navigation, SubmitControl};
pub use notice::{Notice, NoticeTone, NoticeView, NOTICE_TTL};
