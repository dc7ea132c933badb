use crate::cli::ServeArgs;
use crate::infra::{
    build_estimator, load_payoff_directory, AppState, InMemoryInquiryRepository, TracingNotifier,
};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lease_equity::config::AppConfig;
use lease_equity::error::AppError;
use lease_equity::telemetry;
use lease_equity::workflows::equity::LeaseEquityService;
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

    let estimator = build_estimator(&config.valuation, false)?;
    let directory = Arc::new(load_payoff_directory(&config.payoff)?);
    let service = Arc::new(LeaseEquityService::new(
        estimator,
        Arc::new(InMemoryInquiryRepository::default()),
        Arc::new(TracingNotifier),
    ));
    let valuation_source = service.estimator().source_name();

    let app = with_service_routes(service, directory)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, valuation_source, "lease equity service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
