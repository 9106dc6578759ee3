use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use folio_rank::config::AppConfig;
use folio_rank::error::AppError;
use folio_rank::portfolio::PortfolioService;
use folio_rank::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{seed_demo_portfolio, AppState, InMemoryPortfolioRepository};
use crate::routes::with_portfolio_routes;

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

    let repository = Arc::new(InMemoryPortfolioRepository::default());
    seed_demo_portfolio(&repository);
    info!("serving the demo-seeded in-memory portfolio store");

    let portfolio_service = Arc::new(PortfolioService::new(
        repository,
        config.scoring.options(),
    ));

    let app = with_portfolio_routes(portfolio_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "portfolio scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
