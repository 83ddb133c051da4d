use chrono::{DateTime, Utc};

use super::domain::{
    Challenge, ChallengeId, CommunityChallenge, CommunityChallengeId, CommunityParticipation,
    NewChallenge, ParticipationId, PersonalParticipation,
};
use crate::workflows::users::domain::UserId;
use crate::workflows::RepositoryError;

/// Storage abstraction over challenge templates, personal participations,
/// community instances, and community membership rows.
pub trait ChallengeRepository: Send + Sync {
    /// Insert a template, assigning its identifier.
    fn insert_challenge(&self, challenge: NewChallenge) -> Result<Challenge, RepositoryError>;
    fn fetch_challenge(&self, id: ChallengeId) -> Result<Option<Challenge>, RepositoryError>;
    /// Name lookup for duplicate detection when creating templates.
    fn fetch_challenge_by_name(&self, name: &str) -> Result<Option<Challenge>, RepositoryError>;
    fn update_challenge(&self, challenge: Challenge) -> Result<(), RepositoryError>;

    /// Insert a personal participation row, assigning its identifier.
    fn insert_personal(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
        start_date: DateTime<Utc>,
    ) -> Result<PersonalParticipation, RepositoryError>;
    fn fetch_personal(
        &self,
        id: ParticipationId,
    ) -> Result<Option<PersonalParticipation>, RepositoryError>;
    /// The open participation a user has for a challenge, if any.
    fn active_personal(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Option<PersonalParticipation>, RepositoryError>;
    /// Any participation, open or closed, a user has for a challenge.
    fn any_personal(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Option<PersonalParticipation>, RepositoryError>;
    fn list_personal(&self, user_id: UserId)
        -> Result<Vec<PersonalParticipation>, RepositoryError>;
    fn update_personal(&self, participation: PersonalParticipation)
        -> Result<(), RepositoryError>;
    fn delete_personal(&self, id: ParticipationId) -> Result<(), RepositoryError>;
    /// Open personal participations whose challenge window closed at or
    /// before `now`.
    fn open_personal_due(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<PersonalParticipation>, RepositoryError>;

    /// Insert a community instance, assigning its identifier.
    fn insert_community(
        &self,
        challenge_id: ChallengeId,
        created_by: UserId,
    ) -> Result<CommunityChallenge, RepositoryError>;
    fn fetch_community(
        &self,
        id: CommunityChallengeId,
    ) -> Result<Option<CommunityChallenge>, RepositoryError>;
    /// Remove a community instance together with all of its membership rows.
    fn delete_community(&self, id: CommunityChallengeId) -> Result<(), RepositoryError>;

    /// Insert a membership row. Fails with `Conflict` when the user already
    /// holds one for the instance.
    fn insert_member(
        &self,
        member: CommunityParticipation,
    ) -> Result<CommunityParticipation, RepositoryError>;
    fn fetch_member(
        &self,
        community_id: CommunityChallengeId,
        user_id: UserId,
    ) -> Result<Option<CommunityParticipation>, RepositoryError>;
    fn update_member(&self, member: CommunityParticipation) -> Result<(), RepositoryError>;
    fn member_count(&self, community_id: CommunityChallengeId) -> Result<usize, RepositoryError>;
    fn list_memberships(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CommunityParticipation>, RepositoryError>;
    /// Open membership rows whose challenge window closed at or before `now`.
    fn open_members_due(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<CommunityParticipation>, RepositoryError>;
}
