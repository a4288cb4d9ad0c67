use crate::infra::{AppState, Marketplace};
use crate::spa::{spa_router, StaticAssets};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::Utc;
use serde_json::json;
use workboard::marketplace::applications::application_router;
use workboard::marketplace::collectives::collective_router;
use workboard::marketplace::listing::listing_router;
use workboard::marketplace::messaging::conversation_router;
use workboard::marketplace::posting::job_post_router;
use workboard::marketplace::profiles::profile_router;

/// Every HTTP route the service exposes, ending in the SPA catch-all.
pub(crate) fn app_router(marketplace: &Marketplace, assets: StaticAssets) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/api/health", get(healthcheck))
        .route("/api/demo", get(demo_endpoint))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .merge(job_post_router(marketplace.job_posts.clone()))
        .merge(application_router(marketplace.applications.clone()))
        .merge(listing_router(marketplace.catalog.clone()))
        .merge(profile_router(marketplace.profiles.clone()))
        .merge(collective_router(marketplace.collectives.clone()))
        .merge(conversation_router(marketplace.messaging.clone()))
        .merge(spa_router(assets))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "Workboard server is running" }))
}

pub(crate) async fn demo_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Hello from the Workboard API",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
