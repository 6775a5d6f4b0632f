use crate::cli::ServeArgs;
use crate::infra::{resolve_pricing_config, AppState, InMemoryEstimateRepository};
use crate::routes::with_estimate_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use relo_pricing::config::{AppConfig, HashMode};
use relo_pricing::error::AppError;
use relo_pricing::pricing::{HashAlgorithm, PriceEstimator, QuoteService};
use relo_pricing::telemetry;
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

    let pricing = resolve_pricing_config(args.rules.take(), args.tariffs.take())?;
    let rule_count = pricing.rules.len();

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let algorithm = match config.engine.hash_mode {
        HashMode::Sha256 => HashAlgorithm::Sha256,
        HashMode::Fnv1a => HashAlgorithm::Fnv1a,
    };
    let repository = Arc::new(InMemoryEstimateRepository::default());
    let estimator = PriceEstimator::new(pricing).with_hash_algorithm(algorithm);
    let quote_service = Arc::new(QuoteService::new(repository, estimator));

    let app = with_estimate_routes(quote_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, rules = rule_count, "relocation pricing service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
