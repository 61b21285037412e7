use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tracing::warn;

use super::page::Page;
use super::render::{self, ApplyView};
use crate::admissions::{
    AdmissionsBackend, ApplicantField, ApplicationForm, Certificate, LoginForm, Navigation,
    Session, SubmissionError, SubmitControl, UnsupportedCertificate, CERTIFICATE_FIELD,
};

/// Upper bound for an application upload, certificate included.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const STATIC_PAGES: [Page; 6] = [
    Page::Home,
    Page::About,
    Page::Courses,
    Page::Training,
    Page::Blog,
    Page::FeeStructure,
];

/// Router serving every page of the website plus the two form posts.
pub fn site_router<B>(backend: Arc<B>) -> Router
where
    B: AdmissionsBackend + 'static,
{
    let mut router: Router<Arc<B>> = Router::new();
    for page in STATIC_PAGES {
        router = router.route(
            page.path(),
            get(move || async move { Html(render::static_page(page)) }),
        );
    }

    router
        .route(
            Page::ApplyNow.path(),
            get(apply_form_handler::<B>)
                .post(submit_application_handler::<B>)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            Page::Login.path(),
            get(login_form_handler).post(login_handler::<B>),
        )
        .route(Page::AdminPage.path(), get(applications_handler::<B>))
        .fallback(not_found_handler)
        .with_state(backend)
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum UploadError {
    #[error("The upload could not be read: {0}")]
    Multipart(#[from] MultipartError),
    #[error("{0}")]
    Certificate(#[from] UnsupportedCertificate),
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginInput {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub(crate) async fn apply_form_handler<B>(State(backend): State<Arc<B>>) -> Response
where
    B: AdmissionsBackend + 'static,
{
    let mut form = ApplicationForm::new(backend);
    form.mount().await;
    apply_response(StatusCode::OK, &form, None)
}

fn apply_response<B>(
    status: StatusCode,
    form: &ApplicationForm<B>,
    problem: Option<String>,
) -> Response
where
    B: AdmissionsBackend + 'static,
{
    let view = ApplyView {
        values: Some(form.values()),
        notice: form.notice(),
        notice_ttl: form.notice_ttl(),
        problem,
    };
    (status, Html(render::apply_page(&view))).into_response()
}

/// Copies the multipart body into `form`. Only the first non-empty file is considered;
/// a refused file is reported after every text field has been read.
async fn read_application<B>(
    form: &mut ApplicationForm<B>,
    mut multipart: Multipart,
) -> Result<(), UploadError>
where
    B: AdmissionsBackend + 'static,
{
    let mut refused = None;
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == CERTIFICATE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            if (file_name.is_empty() && bytes.is_empty())
                || form.certificate().is_some()
                || refused.is_some()
            {
                continue;
            }
            match Certificate::new(file_name, bytes) {
                Ok(certificate) => form.attach_certificate(certificate),
                Err(err) => refused = Some(err),
            }
        } else if let Some(applicant_field) = ApplicantField::from_wire_name(&name) {
            let value = field.text().await?;
            form.set_field(applicant_field, value);
        }
    }

    match refused {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

pub(crate) async fn submit_application_handler<B>(
    State(backend): State<Arc<B>>,
    multipart: Multipart,
) -> Response
where
    B: AdmissionsBackend + 'static,
{
    let mut form = ApplicationForm::new(backend);

    match read_application(&mut form, multipart).await {
        Ok(()) => {}
        Err(UploadError::Multipart(err)) => {
            warn!(error = %err, "unreadable application upload");
            let status = err.status();
            return apply_response(status, &form, Some(UploadError::from(err).to_string()));
        }
        Err(err @ UploadError::Certificate(_)) => {
            return apply_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                &form,
                Some(err.to_string()),
            );
        }
    }

    match form.submit().await {
        Ok(_) => apply_response(StatusCode::OK, &form, None),
        Err(SubmissionError::Rejected { .. }) => {
            apply_response(StatusCode::BAD_GATEWAY, &form, None)
        }
        Err(err) => apply_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &form,
            Some(err.to_string()),
        ),
    }
}

pub(crate) async fn login_form_handler() -> Html<String> {
    Html(render::login_page("", None, &SubmitControl::default()))
}

fn redirect_with_cookies(navigation: Navigation) -> Response {
    let mut response = Redirect::to(navigation.to.path()).into_response();
    for cookie in navigation.set_cookies {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(_) => warn!("dropping backend cookie that is not a valid header value"),
        }
    }
    response
}

pub(crate) async fn login_handler<B>(
    State(backend): State<Arc<B>>,
    headers: HeaderMap,
    Form(input): Form<LoginInput>,
) -> Response
where
    B: AdmissionsBackend + 'static,
{
    let mut form = LoginForm::new(backend);
    form.set_email(input.email);
    form.set_password(input.password);

    match form.submit(&Session::from_headers(&headers)).await {
        Ok(navigation) => redirect_with_cookies(navigation),
        Err(_) => Html(render::login_page(
            form.email(),
            form.error(),
            &form.submit_control(),
        ))
        .into_response(),
    }
}

pub(crate) async fn applications_handler<B>(
    State(backend): State<Arc<B>>,
    headers: HeaderMap,
) -> Html<String>
where
    B: AdmissionsBackend + 'static,
{
    let records = match backend
        .fetch_applications(&Session::from_headers(&headers))
        .await
    {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "unable to load application listing");
            Vec::new()
        }
    };
    Html(render::admin_page(&records))
}

pub(crate) async fn not_found_handler(uri: Uri) -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(render::not_found_page(uri.path())),
    )
}
