use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::BottleUsage;
use super::repository::ImpactRepository;
use super::service::{ImpactService, ImpactServiceError};
use crate::workflows::users::domain::UserId;
use crate::workflows::users::repository::UserRepository;

/// Router builder exposing bottle logging and the per-user impact ledger.
pub fn impact_router<P, U>(service: Arc<ImpactService<P, U>>) -> Router
where
    P: ImpactRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route("/api/v1/impact/bottles", post(bottles_handler::<P, U>))
        .route("/api/v1/impact/:user_id", get(ledger_handler::<P, U>))
        .with_state(service)
}

fn error_response(error: ImpactServiceError) -> Response {
    let status = match &error {
        ImpactServiceError::InvalidCount => StatusCode::BAD_REQUEST,
        ImpactServiceError::UserNotFound => StatusCode::NOT_FOUND,
        ImpactServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn bottles_handler<P, U>(
    State(service): State<Arc<ImpactService<P, U>>>,
    axum::Json(usage): axum::Json<BottleUsage>,
) -> Response
where
    P: ImpactRepository + 'static,
    U: UserRepository + 'static,
{
    match service.record_bottle_usage(usage) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ledger_handler<P, U>(
    State(service): State<Arc<ImpactService<P, U>>>,
    Path(user_id): Path<i64>,
) -> Response
where
    P: ImpactRepository + 'static,
    U: UserRepository + 'static,
{
    match service.impact_for_user(UserId(user_id)) {
        Ok(records) => (StatusCode::OK, axum::Json(json!({ "impact": records }))).into_response(),
        Err(error) => error_response(error),
    }
}
