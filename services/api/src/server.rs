use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryListingSource};
use crate::routes::with_marketplace_routes;
use agri_market::config::AppConfig;
use agri_market::error::AppError;
use agri_market::marketplace::MarketplaceService;
use agri_market::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = InMemoryListingSource::seeded(config.marketplace.listings_csv.as_deref())?;
    let marketplace = Arc::new(MarketplaceService::with_price_ceiling(
        Arc::new(source),
        config.marketplace.price_ceiling,
    ));
    if let Err(err) = marketplace.refresh() {
        warn!(error = %err, "starting with an empty listing snapshot");
    }

    let app = with_marketplace_routes(marketplace)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "marketplace service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
