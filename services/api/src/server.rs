use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_listing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use listing_core::config::AppConfig;
use listing_core::error::AppError;
use listing_core::processing::router::ListingState;
use listing_core::telemetry;
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

    let listing_state = Arc::new(ListingState::new(
        config.processing.pipeline_config(),
        config.processing.default_country.clone(),
    ));

    let app = with_listing_routes(listing_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_country = %config.processing.default_country,
        suspicion_threshold = config.processing.suspicion_threshold,
        "listing processor ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
