use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use tracing::{error, info};

use crate::cli::ServeArgs;
use crate::infra::{build_services, AppState};
use crate::routes::with_api_routes;
use crate::seed::seed_standard_challenges;
use ecotrack::config::AppConfig;
use ecotrack::error::AppError;
use ecotrack::telemetry;

const EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

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

    let services = build_services();
    seed_standard_challenges(services.challenges.as_ref(), Utc::now())
        .map_err(|err| AppError::Startup(format!("challenge seeding failed: {err}")))?;

    let sweeper = services.challenges.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(EXPIRY_SWEEP_INTERVAL);
        // The first tick fires immediately and closes anything already due.
        loop {
            ticker.tick().await;
            if let Err(err) = sweeper.complete_due(Utc::now()) {
                error!(%err, "challenge expiry sweep failed");
            }
        }
    });

    let app = with_api_routes(&services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "ecotrack service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
