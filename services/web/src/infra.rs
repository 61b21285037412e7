use campus_portal::admissions::HttpAdmissionsBackend;
use campus_portal::config::BackendConfig;
use campus_portal::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn connect_backend(
    config: &BackendConfig,
) -> Result<Arc<HttpAdmissionsBackend>, AppError> {
    let backend = HttpAdmissionsBackend::new(config.clone())?;
    info!(backend = config.base_url(), "admissions backend client ready");
    Ok(Arc::new(backend))
}
