use crate::cli::ServeArgs;
use crate::infra::{connect_backend, AppState};
use crate::routes::with_site_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use campus_portal::config::{AppConfig, BackendConfig};
use campus_portal::error::AppError;
use campus_portal::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) fn apply_backend_override(
    config: &mut AppConfig,
    backend_url: Option<String>,
) -> Result<(), AppError> {
    if let Some(url) = backend_url {
        config.backend = BackendConfig::new(url)?;
    }
    Ok(())
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    apply_backend_override(&mut config, args.backend_url.take())?;

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let backend = connect_backend(&config.backend)?;
    let app = with_site_routes(backend)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        backend = config.backend.base_url(),
        "campus portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
