use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::users::domain::UserId;

/// Identifier wrapper for challenge templates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ChallengeId(pub i64);

/// Identifier wrapper for personal participation rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ParticipationId(pub i64);

/// Identifier wrapper for community challenge instances.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CommunityChallengeId(pub i64);

/// Reusable challenge template carrying the eco-points reward and the window
/// in which participations naturally complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub name: String,
    pub description: String,
    pub eco_points: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Creation payload for a challenge template.
#[derive(Debug, Clone, Deserialize)]
pub struct NewChallenge {
    pub name: String,
    pub description: String,
    pub eco_points: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// One user's run at a challenge. `end_date` is set exactly once, on
/// completion or expiry, and the row is never reopened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalParticipation {
    pub id: ParticipationId,
    pub user_id: UserId,
    pub challenge_id: ChallengeId,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

impl PersonalParticipation {
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_open() {
            "In Progress"
        } else {
            "Completed"
        }
    }
}

/// Multi-user challenge instance created by one user around a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityChallenge {
    pub id: CommunityChallengeId,
    pub challenge_id: ChallengeId,
    pub created_by: UserId,
}

/// Status tracked per community participation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationStatus {
    Active,
    Completed,
    CompletedPrematurely,
    Rejected,
    Pending,
    Accepted,
}

impl ParticipationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ParticipationStatus::Active => "active",
            ParticipationStatus::Completed => "completed",
            ParticipationStatus::CompletedPrematurely => "completed_prematurely",
            ParticipationStatus::Rejected => "rejected",
            ParticipationStatus::Pending => "pending",
            ParticipationStatus::Accepted => "accepted",
        }
    }
}

/// Membership row linking a user to a community challenge instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityParticipation {
    pub community_challenge_id: CommunityChallengeId,
    pub participant_id: UserId,
    pub status: ParticipationStatus,
    pub progress: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

impl CommunityParticipation {
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Share of the reward deducted when a participation is ended before its
/// natural end date.
pub const PREMATURE_COMPLETION_PENALTY: f64 = 0.15;

/// Share of the reward deducted when a personal participation that already
/// accumulated progress is deleted. Deliberately lower than the premature
/// completion rate.
pub const ABANDONED_PROGRESS_PENALTY: f64 = 0.10;

/// Deduct a penalty share of a challenge's reward from a balance, clamping at
/// zero. The penalty is rounded to the nearest whole point.
pub fn deduct_penalty(eco_points: i64, challenge_points: i64, rate: f64) -> i64 {
    let penalty = (challenge_points as f64 * rate).round() as i64;
    (eco_points - penalty).max(0)
}

/// Dates a participant may overwrite on their own personal participation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonalReschedule {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Fields the creator may change on a community challenge's template.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub eco_points: Option<i64>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Personal participation joined with its challenge details for listings.
#[derive(Debug, Clone, Serialize)]
pub struct PersonalChallengeView {
    pub challenge_id: ChallengeId,
    pub name: String,
    pub description: String,
    pub eco_points: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: &'static str,
}

/// Combined status line across personal and community participations.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeStatusEntry {
    pub challenge_id: ChallengeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_challenge_id: Option<CommunityChallengeId>,
    pub name: String,
    pub status: String,
    pub kind: &'static str,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Public detail view of a community challenge instance.
#[derive(Debug, Clone, Serialize)]
pub struct CommunityChallengeDetails {
    pub name: String,
    pub description: String,
    pub eco_points: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_by: UserId,
}

/// Result of a premature completion: the remaining balance and any badges the
/// re-evaluation granted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionOutcome {
    pub eco_points: i64,
    pub awarded_badges: Vec<String>,
}

/// Counters reported by the periodic expiry sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExpirySweep {
    pub personal_completed: usize,
    pub community_completed: usize,
}
