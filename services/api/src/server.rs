use crate::cli::ServeArgs;
use crate::infra::{AppState, Marketplace};
use crate::routes::app_router;
use crate::spa::StaticAssets;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use workboard::config::AppConfig;
use workboard::error::AppError;
use workboard::marketplace::listing::Catalog;
use workboard::marketplace::posting::PostingRules;
use workboard::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(static_dir) = args.static_dir.take() {
        config.server.static_dir = static_dir;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Catalog::load(&config.catalog)?;
    let rules = PostingRules {
        gate_rule: config.posting.gate_rule,
    };
    let marketplace = Marketplace::in_memory(catalog, rules);
    let assets = StaticAssets::new(config.server.static_dir.clone());

    let app = app_router(&marketplace, assets)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        static_dir = %config.server.static_dir.display(),
        "workboard server ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
