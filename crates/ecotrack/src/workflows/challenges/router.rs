use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ChallengeId, ChallengeUpdate, CommunityChallengeId, NewChallenge, ParticipationId,
    PersonalReschedule,
};
use super::repository::ChallengeRepository;
use super::service::{ChallengeService, ChallengeServiceError};
use crate::workflows::badges::repository::BadgeRepository;
use crate::workflows::badges::service::BadgeServiceError;
use crate::workflows::users::domain::UserId;
use crate::workflows::users::repository::UserRepository;

/// Router builder exposing challenge templates plus the personal and
/// community participation lifecycles.
pub fn challenge_router<R, B, U>(service: Arc<ChallengeService<R, B, U>>) -> Router
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route("/api/v1/challenges", post(create_handler::<R, B, U>))
        .route(
            "/api/v1/challenges/personal/join",
            post(join_personal_handler::<R, B, U>),
        )
        .route(
            "/api/v1/challenges/personal/reschedule/:participation_id",
            put(edit_personal_handler::<R, B, U>),
        )
        .route(
            "/api/v1/challenges/personal/:user_id",
            get(list_personal_handler::<R, B, U>),
        )
        .route(
            "/api/v1/challenges/personal/:user_id/:challenge_id/complete",
            post(complete_personal_handler::<R, B, U>),
        )
        .route(
            "/api/v1/challenges/personal/:user_id/:challenge_id",
            delete(delete_personal_handler::<R, B, U>),
        )
        .route(
            "/api/v1/challenges/community",
            post(create_community_handler::<R, B, U>),
        )
        .route(
            "/api/v1/challenges/community/join",
            post(join_community_handler::<R, B, U>),
        )
        .route(
            "/api/v1/challenges/community/:community_id",
            get(community_details_handler::<R, B, U>),
        )
        .route(
            "/api/v1/challenges/community/:community_id/:user_id/complete",
            post(complete_community_handler::<R, B, U>),
        )
        .route(
            "/api/v1/challenges/community/:community_id/:user_id",
            delete(delete_community_handler::<R, B, U>).put(edit_community_handler::<R, B, U>),
        )
        .route(
            "/api/v1/challenges/status/:user_id",
            get(status_handler::<R, B, U>),
        )
        .with_state(service)
}

fn error_response(error: ChallengeServiceError) -> Response {
    let status = match &error {
        ChallengeServiceError::MissingFields
        | ChallengeServiceError::StartDateInPast
        | ChallengeServiceError::InvalidDateRange => StatusCode::BAD_REQUEST,
        ChallengeServiceError::DuplicateName | ChallengeServiceError::AlreadyJoined => {
            StatusCode::CONFLICT
        }
        ChallengeServiceError::UserNotFound
        | ChallengeServiceError::ChallengeNotFound
        | ChallengeServiceError::ParticipationNotFound
        | ChallengeServiceError::CommunityChallengeNotFound => StatusCode::NOT_FOUND,
        ChallengeServiceError::NotParticipant
        | ChallengeServiceError::NotCreator
        | ChallengeServiceError::HasOtherParticipants => StatusCode::FORBIDDEN,
        ChallengeServiceError::Badges(BadgeServiceError::Repository(_))
        | ChallengeServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ChallengeServiceError::Badges(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn create_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    axum::Json(new_challenge): axum::Json<NewChallenge>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.create_challenge(new_challenge) {
        Ok(challenge) => (StatusCode::CREATED, axum::Json(challenge)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct JoinPersonalRequest {
    user_id: UserId,
    challenge_id: ChallengeId,
}

pub(crate) async fn join_personal_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    axum::Json(request): axum::Json<JoinPersonalRequest>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.join_personal(request.user_id, request.challenge_id, Utc::now()) {
        Ok(participation) => (StatusCode::CREATED, axum::Json(participation)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RescheduleRequest {
    user_id: UserId,
    #[serde(flatten)]
    reschedule: PersonalReschedule,
}

pub(crate) async fn edit_personal_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    Path(participation_id): Path<i64>,
    axum::Json(request): axum::Json<RescheduleRequest>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.edit_personal(
        ParticipationId(participation_id),
        request.user_id,
        request.reschedule,
        Utc::now(),
    ) {
        Ok(participation) => (StatusCode::OK, axum::Json(participation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_personal_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    Path((user_id, challenge_id)): Path<(i64, i64)>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.complete_personal_prematurely(
        UserId(user_id),
        ChallengeId(challenge_id),
        Utc::now(),
    ) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_personal_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    Path((user_id, challenge_id)): Path<(i64, i64)>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.delete_personal(UserId(user_id), ChallengeId(challenge_id)) {
        Ok(eco_points) => {
            (StatusCode::OK, axum::Json(json!({ "eco_points": eco_points }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_personal_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    Path(user_id): Path<i64>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.list_personal(UserId(user_id)) {
        Ok(challenges) => {
            (StatusCode::OK, axum::Json(json!({ "challenges": challenges }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateCommunityRequest {
    user_id: UserId,
    #[serde(flatten)]
    challenge: NewChallenge,
}

pub(crate) async fn create_community_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    axum::Json(request): axum::Json<CreateCommunityRequest>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.create_community(request.user_id, request.challenge, Utc::now()) {
        Ok(community) => (StatusCode::CREATED, axum::Json(community)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct JoinCommunityRequest {
    user_id: UserId,
    community_id: CommunityChallengeId,
}

pub(crate) async fn join_community_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    axum::Json(request): axum::Json<JoinCommunityRequest>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.join_community(request.user_id, request.community_id, Utc::now()) {
        Ok(member) => (StatusCode::CREATED, axum::Json(member)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_community_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    Path((community_id, user_id)): Path<(i64, i64)>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.complete_community_prematurely(
        UserId(user_id),
        CommunityChallengeId(community_id),
        Utc::now(),
    ) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_community_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    Path((community_id, user_id)): Path<(i64, i64)>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.delete_community(UserId(user_id), CommunityChallengeId(community_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn edit_community_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    Path((community_id, user_id)): Path<(i64, i64)>,
    axum::Json(update): axum::Json<ChallengeUpdate>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.edit_community(
        UserId(user_id),
        CommunityChallengeId(community_id),
        update,
        Utc::now(),
    ) {
        Ok(challenge) => (StatusCode::OK, axum::Json(challenge)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn community_details_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    Path(community_id): Path<i64>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.community_details(CommunityChallengeId(community_id)) {
        Ok(details) => (StatusCode::OK, axum::Json(details)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, B, U>(
    State(service): State<Arc<ChallengeService<R, B, U>>>,
    Path(user_id): Path<i64>,
) -> Response
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.challenge_status(UserId(user_id)) {
        Ok(entries) => {
            (StatusCode::OK, axum::Json(json!({ "challenges": entries }))).into_response()
        }
        Err(error) => error_response(error),
    }
}
