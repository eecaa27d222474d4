use crate::cli::ServeArgs;
use crate::infra::{build_engine, build_review_service, AppState, InMemoryRatingRepository};
use crate::routes::with_estupiso_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use estupiso::config::AppConfig;
use estupiso::error::AppError;
use estupiso::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = Arc::new(build_engine(&config)?);
    let repository = Arc::new(InMemoryRatingRepository::default());
    let review_service = Arc::new(build_review_service(&config, repository));

    let app = with_estupiso_routes(engine, review_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        cooldown_months = config.reviews.cooldown_months,
        "estupiso api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
