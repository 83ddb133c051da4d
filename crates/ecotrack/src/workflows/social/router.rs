use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{InvitationId, NewInvitation};
use super::repository::InvitationRepository;
use super::service::{InvitationService, InvitationServiceError};
use crate::workflows::challenges::repository::ChallengeRepository;
use crate::workflows::users::domain::UserId;
use crate::workflows::users::repository::UserRepository;

/// Router builder exposing invitation delivery and responses.
pub fn invitation_router<I, R, U>(service: Arc<InvitationService<I, R, U>>) -> Router
where
    I: InvitationRepository + 'static,
    R: ChallengeRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route("/api/v1/invitations", post(send_handler::<I, R, U>))
        .route(
            "/api/v1/invitations/:invitation_id/respond",
            post(respond_handler::<I, R, U>),
        )
        .route(
            "/api/v1/invitations/pending/:user_id",
            get(pending_handler::<I, R, U>),
        )
        .with_state(service)
}

fn error_response(error: InvitationServiceError) -> Response {
    let status = match &error {
        InvitationServiceError::ExactlyOneTarget => StatusCode::BAD_REQUEST,
        InvitationServiceError::UserNotFound
        | InvitationServiceError::ChallengeNotFound
        | InvitationServiceError::CommunityChallengeNotFound
        | InvitationServiceError::InvitationNotFound => StatusCode::NOT_FOUND,
        InvitationServiceError::NotRecipient => StatusCode::FORBIDDEN,
        InvitationServiceError::AlreadyResolved | InvitationServiceError::AlreadyJoined => {
            StatusCode::CONFLICT
        }
        InvitationServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn send_handler<I, R, U>(
    State(service): State<Arc<InvitationService<I, R, U>>>,
    axum::Json(new_invitation): axum::Json<NewInvitation>,
) -> Response
where
    I: InvitationRepository + 'static,
    R: ChallengeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.send(new_invitation, Utc::now()) {
        Ok(invitation) => (StatusCode::CREATED, axum::Json(invitation)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RespondRequest {
    user_id: UserId,
    accept: bool,
}

pub(crate) async fn respond_handler<I, R, U>(
    State(service): State<Arc<InvitationService<I, R, U>>>,
    Path(invitation_id): Path<i64>,
    axum::Json(request): axum::Json<RespondRequest>,
) -> Response
where
    I: InvitationRepository + 'static,
    R: ChallengeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.respond(
        InvitationId(invitation_id),
        request.user_id,
        request.accept,
        Utc::now(),
    ) {
        Ok(invitation) => (StatusCode::OK, axum::Json(invitation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pending_handler<I, R, U>(
    State(service): State<Arc<InvitationService<I, R, U>>>,
    Path(user_id): Path<i64>,
) -> Response
where
    I: InvitationRepository + 'static,
    R: ChallengeRepository + 'static,
    U: UserRepository + 'static,
{
    match service.pending_for(UserId(user_id)) {
        Ok(invitations) => {
            (StatusCode::OK, axum::Json(json!({ "invitations": invitations }))).into_response()
        }
        Err(error) => error_response(error),
    }
}
