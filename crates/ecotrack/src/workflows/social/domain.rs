use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::challenges::domain::{ChallengeId, CommunityChallengeId};
use crate::workflows::users::domain::UserId;

/// Identifier wrapper for challenge invitations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct InvitationId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InvitationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Rejected => "rejected",
        }
    }
}

/// Invitation from one user to another to join a challenge. Exactly one of
/// the two target fields is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeInvitation {
    pub id: InvitationId,
    pub sender: UserId,
    pub recipient: UserId,
    pub personal_challenge: Option<ChallengeId>,
    pub community_challenge: Option<CommunityChallengeId>,
    pub status: InvitationStatus,
    pub sent_at: DateTime<Utc>,
}

/// Creation payload for an invitation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInvitation {
    pub sender: UserId,
    pub recipient: UserId,
    #[serde(default)]
    pub personal_challenge: Option<ChallengeId>,
    #[serde(default)]
    pub community_challenge: Option<CommunityChallengeId>,
}
