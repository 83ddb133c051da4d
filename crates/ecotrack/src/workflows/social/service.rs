use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{ChallengeInvitation, InvitationId, InvitationStatus, NewInvitation};
use super::repository::InvitationRepository;
use crate::workflows::challenges::domain::{CommunityParticipation, ParticipationStatus};
use crate::workflows::challenges::repository::ChallengeRepository;
use crate::workflows::users::domain::UserId;
use crate::workflows::users::repository::UserRepository;
use crate::workflows::RepositoryError;

/// Service for inviting other users into challenges. Accepting an invitation
/// enrolls the recipient in the referenced challenge.
pub struct InvitationService<I, R, U> {
    invitations: Arc<I>,
    challenges: Arc<R>,
    users: Arc<U>,
}

impl<I, R, U> InvitationService<I, R, U>
where
    I: InvitationRepository + 'static,
    R: ChallengeRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(invitations: Arc<I>, challenges: Arc<R>, users: Arc<U>) -> Self {
        Self {
            invitations,
            challenges,
            users,
        }
    }

    /// Send an invitation. Exactly one challenge target must be named, and
    /// both parties and the target must exist.
    pub fn send(
        &self,
        new_invitation: NewInvitation,
        now: DateTime<Utc>,
    ) -> Result<ChallengeInvitation, InvitationServiceError> {
        let NewInvitation {
            sender,
            recipient,
            personal_challenge,
            community_challenge,
        } = new_invitation;

        if personal_challenge.is_some() == community_challenge.is_some() {
            return Err(InvitationServiceError::ExactlyOneTarget);
        }
        self.require_user(sender)?;
        self.require_user(recipient)?;
        if let Some(challenge_id) = personal_challenge {
            if self.challenges.fetch_challenge(challenge_id)?.is_none() {
                return Err(InvitationServiceError::ChallengeNotFound);
            }
        }
        if let Some(community_id) = community_challenge {
            if self.challenges.fetch_community(community_id)?.is_none() {
                return Err(InvitationServiceError::CommunityChallengeNotFound);
            }
        }

        let invitation = self.invitations.insert(ChallengeInvitation {
            id: InvitationId(0),
            sender,
            recipient,
            personal_challenge,
            community_challenge,
            status: InvitationStatus::Pending,
            sent_at: now,
        })?;
        info!(
            invitation_id = invitation.id.0,
            sender = sender.0,
            recipient = recipient.0,
            "sent challenge invitation"
        );
        Ok(invitation)
    }

    /// Answer an invitation. Only the recipient may answer, and only while it
    /// is still pending. Acceptance enrolls them in the target challenge.
    pub fn respond(
        &self,
        invitation_id: InvitationId,
        user_id: UserId,
        accept: bool,
        now: DateTime<Utc>,
    ) -> Result<ChallengeInvitation, InvitationServiceError> {
        let mut invitation = self
            .invitations
            .fetch(invitation_id)?
            .ok_or(InvitationServiceError::InvitationNotFound)?;
        if invitation.recipient != user_id {
            return Err(InvitationServiceError::NotRecipient);
        }
        if invitation.status != InvitationStatus::Pending {
            return Err(InvitationServiceError::AlreadyResolved);
        }

        if accept {
            self.enroll(&invitation, now)?;
            invitation.status = InvitationStatus::Accepted;
        } else {
            invitation.status = InvitationStatus::Rejected;
        }
        self.invitations.update(invitation.clone())?;
        info!(
            invitation_id = invitation.id.0,
            status = invitation.status.label(),
            "answered challenge invitation"
        );
        Ok(invitation)
    }

    pub fn pending_for(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ChallengeInvitation>, InvitationServiceError> {
        self.require_user(user_id)?;
        Ok(self.invitations.pending_for(user_id)?)
    }

    fn enroll(
        &self,
        invitation: &ChallengeInvitation,
        now: DateTime<Utc>,
    ) -> Result<(), InvitationServiceError> {
        // Personal runs carry no uniqueness constraint, so acceptance always
        // opens a fresh run.
        if let Some(challenge_id) = invitation.personal_challenge {
            self.challenges
                .insert_personal(invitation.recipient, challenge_id, now)?;
            return Ok(());
        }
        if let Some(community_id) = invitation.community_challenge {
            let member = CommunityParticipation {
                community_challenge_id: community_id,
                participant_id: invitation.recipient,
                status: ParticipationStatus::Active,
                progress: 0,
                start_date: now,
                end_date: None,
            };
            return match self.challenges.insert_member(member) {
                Ok(_) => Ok(()),
                Err(RepositoryError::Conflict) => Err(InvitationServiceError::AlreadyJoined),
                Err(other) => Err(other.into()),
            };
        }
        // Send-side validation guarantees one target is present.
        Err(InvitationServiceError::ExactlyOneTarget)
    }

    fn require_user(&self, user_id: UserId) -> Result<(), InvitationServiceError> {
        if self.users.fetch(user_id)?.is_none() {
            return Err(InvitationServiceError::UserNotFound);
        }
        Ok(())
    }
}

/// Error raised by the invitation service.
#[derive(Debug, thiserror::Error)]
pub enum InvitationServiceError {
    #[error("exactly one challenge target must be named")]
    ExactlyOneTarget,
    #[error("user not found")]
    UserNotFound,
    #[error("challenge not found")]
    ChallengeNotFound,
    #[error("community challenge not found")]
    CommunityChallengeNotFound,
    #[error("invitation not found")]
    InvitationNotFound,
    #[error("only the recipient may answer an invitation")]
    NotRecipient,
    #[error("invitation was already answered")]
    AlreadyResolved,
    #[error("user already participates in this challenge")]
    AlreadyJoined,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
