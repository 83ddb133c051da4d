use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{NewUser, UserId};
use super::repository::{PasswordHasher, UserRepository};
use super::service::{UserService, UserServiceError};

const LEADERBOARD_LIMIT: usize = 10;

/// Router builder exposing account registration, profiles, and the leaderboard.
pub fn user_router<U, H>(service: Arc<UserService<U, H>>) -> Router
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    Router::new()
        .route("/api/v1/users", post(register_handler::<U, H>))
        .route(
            "/api/v1/users/:user_id/profile",
            get(profile_handler::<U, H>),
        )
        .route(
            "/api/v1/users/:user_id/eco-points",
            get(eco_points_handler::<U, H>),
        )
        .route(
            "/api/v1/users/:user_id/profile-picture",
            put(profile_picture_handler::<U, H>),
        )
        .route("/api/v1/leaderboard", get(leaderboard_handler::<U, H>))
        .with_state(service)
}

fn error_response(error: UserServiceError) -> Response {
    let status = match &error {
        UserServiceError::MissingFields => StatusCode::BAD_REQUEST,
        UserServiceError::IdentityTaken => StatusCode::CONFLICT,
        UserServiceError::UserNotFound => StatusCode::NOT_FOUND,
        UserServiceError::Credential(_) | UserServiceError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn register_handler<U, H>(
    State(service): State<Arc<UserService<U, H>>>,
    axum::Json(new_user): axum::Json<NewUser>,
) -> Response
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    match service.register(new_user) {
        Ok(user) => {
            let payload = json!({
                "message": "Registration successful",
                "user_id": user.id,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<U, H>(
    State(service): State<Arc<UserService<U, H>>>,
    Path(user_id): Path<i64>,
) -> Response
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    match service.profile(UserId(user_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfilePictureRequest {
    profile_picture: String,
}

pub(crate) async fn profile_picture_handler<U, H>(
    State(service): State<Arc<UserService<U, H>>>,
    Path(user_id): Path<i64>,
    axum::Json(request): axum::Json<ProfilePictureRequest>,
) -> Response
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    match service.update_profile_picture(UserId(user_id), request.profile_picture) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eco_points_handler<U, H>(
    State(service): State<Arc<UserService<U, H>>>,
    Path(user_id): Path<i64>,
) -> Response
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    match service.eco_points(UserId(user_id)) {
        Ok(eco_points) => {
            (StatusCode::OK, axum::Json(json!({ "eco_points": eco_points }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn leaderboard_handler<U, H>(
    State(service): State<Arc<UserService<U, H>>>,
) -> Response
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    match service.leaderboard(LEADERBOARD_LIMIT) {
        Ok(leaderboard) => {
            (StatusCode::OK, axum::Json(json!({ "leaderboard": leaderboard }))).into_response()
        }
        Err(error) => error_response(error),
    }
}
