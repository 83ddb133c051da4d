use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

use crate::infra::{AppState, Services};
use ecotrack::workflows::badges::badge_router;
use ecotrack::workflows::challenges::challenge_router;
use ecotrack::workflows::impact::impact_router;
use ecotrack::workflows::social::invitation_router;
use ecotrack::workflows::users::user_router;

/// Compose every workflow router with the operational endpoints.
pub(crate) fn with_api_routes(services: &Services) -> axum::Router {
    user_router(services.users.clone())
        .merge(impact_router(services.impact.clone()))
        .merge(challenge_router(services.challenges.clone()))
        .merge(badge_router(services.badges.clone()))
        .merge(invitation_router(services.invitations.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
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
