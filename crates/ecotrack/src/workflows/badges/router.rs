use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::NewBadge;
use super::repository::BadgeRepository;
use super::service::{BadgeService, BadgeServiceError};
use crate::workflows::users::domain::UserId;
use crate::workflows::users::repository::UserRepository;

/// Router builder exposing badge administration and per-user listings.
pub fn badge_router<B, U>(service: Arc<BadgeService<B, U>>) -> Router
where
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route("/api/v1/badges", post(create_handler::<B, U>))
        .route("/api/v1/badges/award", post(award_handler::<B, U>))
        .route("/api/v1/badges/:user_id", get(list_handler::<B, U>))
        .with_state(service)
}

fn error_response(error: BadgeServiceError) -> Response {
    let status = match &error {
        BadgeServiceError::MissingFields => StatusCode::BAD_REQUEST,
        BadgeServiceError::DuplicateName | BadgeServiceError::AlreadyAwarded => {
            StatusCode::CONFLICT
        }
        BadgeServiceError::UserNotFound | BadgeServiceError::BadgeNotFound => {
            StatusCode::NOT_FOUND
        }
        BadgeServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn create_handler<B, U>(
    State(service): State<Arc<BadgeService<B, U>>>,
    axum::Json(new_badge): axum::Json<NewBadge>,
) -> Response
where
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.create_badge(new_badge) {
        Ok(badge) => (StatusCode::CREATED, axum::Json(badge)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AwardRequest {
    user_id: UserId,
    badge_name: String,
}

pub(crate) async fn award_handler<B, U>(
    State(service): State<Arc<BadgeService<B, U>>>,
    axum::Json(request): axum::Json<AwardRequest>,
) -> Response
where
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.award_named(request.user_id, &request.badge_name) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<B, U>(
    State(service): State<Arc<BadgeService<B, U>>>,
    Path(user_id): Path<i64>,
) -> Response
where
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.badges_for_user(UserId(user_id)) {
        Ok(badges) => (StatusCode::OK, axum::Json(json!({ "badges": badges }))).into_response(),
        Err(error) => error_response(error),
    }
}
