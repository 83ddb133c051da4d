use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{
    deduct_penalty, Challenge, ChallengeId, ChallengeStatusEntry, ChallengeUpdate,
    CommunityChallenge, CommunityChallengeDetails, CommunityChallengeId, CommunityParticipation,
    CompletionOutcome, ExpirySweep, NewChallenge, ParticipationId, ParticipationStatus,
    PersonalChallengeView, PersonalParticipation, PersonalReschedule,
    ABANDONED_PROGRESS_PENALTY, PREMATURE_COMPLETION_PENALTY,
};
use super::repository::ChallengeRepository;
use crate::workflows::badges::repository::BadgeRepository;
use crate::workflows::badges::service::{BadgeService, BadgeServiceError};
use crate::workflows::users::domain::{User, UserId};
use crate::workflows::users::repository::UserRepository;
use crate::workflows::RepositoryError;

/// Service orchestrating challenge templates, personal runs, and community
/// instances. Badge evaluation is re-run after every balance change.
pub struct ChallengeService<R, B, U> {
    challenges: Arc<R>,
    users: Arc<U>,
    badges: Arc<BadgeService<B, U>>,
}

impl<R, B, U> ChallengeService<R, B, U>
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(challenges: Arc<R>, users: Arc<U>, badges: Arc<BadgeService<B, U>>) -> Self {
        Self {
            challenges,
            users,
            badges,
        }
    }

    /// Create a reusable challenge template.
    pub fn create_challenge(
        &self,
        new_challenge: NewChallenge,
    ) -> Result<Challenge, ChallengeServiceError> {
        if new_challenge.name.trim().is_empty()
            || new_challenge.description.trim().is_empty()
            || new_challenge.eco_points <= 0
        {
            return Err(ChallengeServiceError::MissingFields);
        }
        if new_challenge.end_date < new_challenge.start_date {
            return Err(ChallengeServiceError::InvalidDateRange);
        }
        if self
            .challenges
            .fetch_challenge_by_name(&new_challenge.name)?
            .is_some()
        {
            return Err(ChallengeServiceError::DuplicateName);
        }
        let challenge = self.challenges.insert_challenge(new_challenge)?;
        info!(challenge = %challenge.name, "created challenge");
        Ok(challenge)
    }

    /// Template lookup by its unique name.
    pub fn challenge_by_name(&self, name: &str) -> Result<Challenge, ChallengeServiceError> {
        self.challenges
            .fetch_challenge_by_name(name)?
            .ok_or(ChallengeServiceError::ChallengeNotFound)
    }

    /// Start a personal run at a challenge. Personal runs carry no uniqueness
    /// constraint; a user may hold several open runs at the same challenge.
    pub fn join_personal(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
        now: DateTime<Utc>,
    ) -> Result<PersonalParticipation, ChallengeServiceError> {
        self.require_user(user_id)?;
        self.require_challenge(challenge_id)?;
        let participation = self.challenges.insert_personal(user_id, challenge_id, now)?;
        info!(
            user_id = user_id.0,
            challenge_id = challenge_id.0,
            "joined personal challenge"
        );
        Ok(participation)
    }

    /// Reschedule an open personal run. Only the participant may edit, and
    /// the new start date may not lie in the past.
    pub fn edit_personal(
        &self,
        participation_id: ParticipationId,
        actor: UserId,
        reschedule: PersonalReschedule,
        now: DateTime<Utc>,
    ) -> Result<PersonalParticipation, ChallengeServiceError> {
        let mut participation = self
            .challenges
            .fetch_personal(participation_id)?
            .ok_or(ChallengeServiceError::ParticipationNotFound)?;
        if participation.user_id != actor {
            return Err(ChallengeServiceError::NotParticipant);
        }
        if let Some(start_date) = reschedule.start_date {
            if start_date < now {
                return Err(ChallengeServiceError::StartDateInPast);
            }
            participation.start_date = start_date;
        }
        if let Some(end_date) = reschedule.end_date {
            if end_date < participation.start_date {
                return Err(ChallengeServiceError::InvalidDateRange);
            }
            participation.end_date = Some(end_date);
        }
        self.challenges.update_personal(participation.clone())?;
        Ok(participation)
    }

    /// Close an open personal run before its natural end. Costs 15% of the
    /// challenge reward, then re-evaluates badges against the new balance.
    pub fn complete_personal_prematurely(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
        now: DateTime<Utc>,
    ) -> Result<CompletionOutcome, ChallengeServiceError> {
        let mut user = self.require_user(user_id)?;
        let challenge = self.require_challenge(challenge_id)?;
        let mut participation = self
            .challenges
            .active_personal(user_id, challenge_id)?
            .ok_or(ChallengeServiceError::ParticipationNotFound)?;

        participation.end_date = Some(now);
        self.challenges.update_personal(participation)?;

        user.eco_points = deduct_penalty(
            user.eco_points,
            challenge.eco_points,
            PREMATURE_COMPLETION_PENALTY,
        );
        self.users.update(user.clone())?;
        info!(
            user_id = user_id.0,
            challenge_id = challenge_id.0,
            eco_points = user.eco_points,
            "completed personal challenge prematurely"
        );

        let awarded_badges = self.badges.evaluate_and_award(&user)?;
        Ok(CompletionOutcome {
            eco_points: user.eco_points,
            awarded_badges,
        })
    }

    /// Delete a personal run. A run that was already closed counts as
    /// progress and costs 10% of the challenge reward.
    pub fn delete_personal(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<i64, ChallengeServiceError> {
        let mut user = self.require_user(user_id)?;
        let challenge = self.require_challenge(challenge_id)?;
        let participation = self
            .challenges
            .any_personal(user_id, challenge_id)?
            .ok_or(ChallengeServiceError::ParticipationNotFound)?;

        if participation.end_date.is_some() {
            user.eco_points = deduct_penalty(
                user.eco_points,
                challenge.eco_points,
                ABANDONED_PROGRESS_PENALTY,
            );
            self.users.update(user.clone())?;
        }
        self.challenges.delete_personal(participation.id)?;
        info!(
            user_id = user_id.0,
            challenge_id = challenge_id.0,
            "deleted personal challenge"
        );
        Ok(user.eco_points)
    }

    pub fn list_personal(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PersonalChallengeView>, ChallengeServiceError> {
        self.require_user(user_id)?;
        let mut views = Vec::new();
        for participation in self.challenges.list_personal(user_id)? {
            let challenge = self.require_challenge(participation.challenge_id)?;
            views.push(PersonalChallengeView {
                challenge_id: challenge.id,
                name: challenge.name,
                description: challenge.description,
                eco_points: challenge.eco_points,
                start_date: participation.start_date,
                end_date: participation.end_date,
                status: participation.status_label(),
            });
        }
        Ok(views)
    }

    /// Create a community instance around a fresh template. The creator is
    /// enrolled as its first participant.
    pub fn create_community(
        &self,
        created_by: UserId,
        new_challenge: NewChallenge,
        now: DateTime<Utc>,
    ) -> Result<CommunityChallenge, ChallengeServiceError> {
        self.require_user(created_by)?;
        let challenge = self.create_challenge(new_challenge)?;
        let community = self.challenges.insert_community(challenge.id, created_by)?;
        self.challenges.insert_member(CommunityParticipation {
            community_challenge_id: community.id,
            participant_id: created_by,
            status: ParticipationStatus::Active,
            progress: 0,
            start_date: now,
            end_date: None,
        })?;
        info!(
            user_id = created_by.0,
            community_id = community.id.0,
            "created community challenge"
        );
        Ok(community)
    }

    /// Join a community instance. Each user may hold at most one membership
    /// row per instance, ever.
    pub fn join_community(
        &self,
        user_id: UserId,
        community_id: CommunityChallengeId,
        now: DateTime<Utc>,
    ) -> Result<CommunityParticipation, ChallengeServiceError> {
        self.require_user(user_id)?;
        self.require_community(community_id)?;
        let member = CommunityParticipation {
            community_challenge_id: community_id,
            participant_id: user_id,
            status: ParticipationStatus::Active,
            progress: 0,
            start_date: now,
            end_date: None,
        };
        match self.challenges.insert_member(member) {
            Ok(member) => {
                info!(
                    user_id = user_id.0,
                    community_id = community_id.0,
                    "joined community challenge"
                );
                Ok(member)
            }
            Err(RepositoryError::Conflict) => Err(ChallengeServiceError::AlreadyJoined),
            Err(other) => Err(other.into()),
        }
    }

    /// Close an open community membership before the challenge window ends.
    /// Costs 15% of the reward and marks the row accordingly.
    pub fn complete_community_prematurely(
        &self,
        user_id: UserId,
        community_id: CommunityChallengeId,
        now: DateTime<Utc>,
    ) -> Result<CompletionOutcome, ChallengeServiceError> {
        let mut user = self.require_user(user_id)?;
        let community = self.require_community(community_id)?;
        let challenge = self.require_challenge(community.challenge_id)?;
        let mut member = self
            .challenges
            .fetch_member(community_id, user_id)?
            .ok_or(ChallengeServiceError::ParticipationNotFound)?;
        if !member.is_open() {
            return Err(ChallengeServiceError::ParticipationNotFound);
        }

        member.end_date = Some(now);
        member.status = ParticipationStatus::CompletedPrematurely;
        self.challenges.update_member(member)?;

        user.eco_points = deduct_penalty(
            user.eco_points,
            challenge.eco_points,
            PREMATURE_COMPLETION_PENALTY,
        );
        self.users.update(user.clone())?;
        info!(
            user_id = user_id.0,
            community_id = community_id.0,
            eco_points = user.eco_points,
            "completed community challenge prematurely"
        );

        let awarded_badges = self.badges.evaluate_and_award(&user)?;
        Ok(CompletionOutcome {
            eco_points: user.eco_points,
            awarded_badges,
        })
    }

    /// Delete a community instance. Only the creator may delete, and only
    /// while no one else participates. Deletion never touches the creator's
    /// eco-point balance.
    pub fn delete_community(
        &self,
        user_id: UserId,
        community_id: CommunityChallengeId,
    ) -> Result<(), ChallengeServiceError> {
        self.require_user(user_id)?;
        let community = self.require_community(community_id)?;
        if community.created_by != user_id {
            return Err(ChallengeServiceError::NotCreator);
        }
        if self.challenges.member_count(community_id)? > 1 {
            return Err(ChallengeServiceError::HasOtherParticipants);
        }

        self.challenges.delete_community(community_id)?;
        info!(
            user_id = user_id.0,
            community_id = community_id.0,
            "deleted community challenge"
        );
        Ok(())
    }

    /// Edit the template behind a community instance. Creator only; the new
    /// start date may not lie in the past.
    pub fn edit_community(
        &self,
        user_id: UserId,
        community_id: CommunityChallengeId,
        update: ChallengeUpdate,
        now: DateTime<Utc>,
    ) -> Result<Challenge, ChallengeServiceError> {
        self.require_user(user_id)?;
        let community = self.require_community(community_id)?;
        if community.created_by != user_id {
            return Err(ChallengeServiceError::NotCreator);
        }
        if update.start_date < now {
            return Err(ChallengeServiceError::StartDateInPast);
        }
        if update.end_date < update.start_date {
            return Err(ChallengeServiceError::InvalidDateRange);
        }

        let mut challenge = self.require_challenge(community.challenge_id)?;
        if let Some(name) = update.name {
            challenge.name = name;
        }
        if let Some(description) = update.description {
            challenge.description = description;
        }
        if let Some(eco_points) = update.eco_points {
            challenge.eco_points = eco_points;
        }
        challenge.start_date = update.start_date;
        challenge.end_date = update.end_date;
        self.challenges.update_challenge(challenge.clone())?;
        Ok(challenge)
    }

    pub fn community_details(
        &self,
        community_id: CommunityChallengeId,
    ) -> Result<CommunityChallengeDetails, ChallengeServiceError> {
        let community = self.require_community(community_id)?;
        let challenge = self.require_challenge(community.challenge_id)?;
        Ok(CommunityChallengeDetails {
            name: challenge.name,
            description: challenge.description,
            eco_points: challenge.eco_points,
            start_date: challenge.start_date,
            end_date: challenge.end_date,
            created_by: community.created_by,
        })
    }

    /// Combined status of all personal runs and community memberships a user
    /// holds.
    pub fn challenge_status(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ChallengeStatusEntry>, ChallengeServiceError> {
        self.require_user(user_id)?;
        let mut entries = Vec::new();
        for participation in self.challenges.list_personal(user_id)? {
            let challenge = self.require_challenge(participation.challenge_id)?;
            entries.push(ChallengeStatusEntry {
                challenge_id: challenge.id,
                community_challenge_id: None,
                name: challenge.name,
                status: participation.status_label().to_string(),
                kind: "personal",
                start_date: participation.start_date,
                end_date: participation.end_date,
            });
        }
        for member in self.challenges.list_memberships(user_id)? {
            let community = self.require_community(member.community_challenge_id)?;
            let challenge = self.require_challenge(community.challenge_id)?;
            entries.push(ChallengeStatusEntry {
                challenge_id: challenge.id,
                community_challenge_id: Some(member.community_challenge_id),
                name: challenge.name,
                status: member.status.label().to_string(),
                kind: "community",
                start_date: member.start_date,
                end_date: member.end_date,
            });
        }
        Ok(entries)
    }

    /// Close every open participation whose challenge window has ended.
    /// Natural completion carries no penalty.
    pub fn complete_due(&self, now: DateTime<Utc>) -> Result<ExpirySweep, ChallengeServiceError> {
        info!("running automatic challenge completion");
        let mut sweep = ExpirySweep::default();

        for mut participation in self.challenges.open_personal_due(now)? {
            participation.end_date = Some(now);
            self.challenges.update_personal(participation)?;
            sweep.personal_completed += 1;
        }
        for mut member in self.challenges.open_members_due(now)? {
            member.end_date = Some(now);
            member.status = ParticipationStatus::Completed;
            self.challenges.update_member(member)?;
            sweep.community_completed += 1;
        }

        info!(
            personal = sweep.personal_completed,
            community = sweep.community_completed,
            "automatic challenge completion finished"
        );
        Ok(sweep)
    }

    fn require_user(&self, user_id: UserId) -> Result<User, ChallengeServiceError> {
        self.users
            .fetch(user_id)?
            .ok_or(ChallengeServiceError::UserNotFound)
    }

    fn require_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Challenge, ChallengeServiceError> {
        self.challenges
            .fetch_challenge(challenge_id)?
            .ok_or(ChallengeServiceError::ChallengeNotFound)
    }

    fn require_community(
        &self,
        community_id: CommunityChallengeId,
    ) -> Result<CommunityChallenge, ChallengeServiceError> {
        self.challenges
            .fetch_community(community_id)?
            .ok_or(ChallengeServiceError::CommunityChallengeNotFound)
    }
}

/// Error raised by the challenge service.
#[derive(Debug, thiserror::Error)]
pub enum ChallengeServiceError {
    #[error("name, description, and a positive eco-points reward are required")]
    MissingFields,
    #[error("challenge name already in use")]
    DuplicateName,
    #[error("user not found")]
    UserNotFound,
    #[error("challenge not found")]
    ChallengeNotFound,
    #[error("participation not found")]
    ParticipationNotFound,
    #[error("community challenge not found")]
    CommunityChallengeNotFound,
    #[error("user already participates in this challenge")]
    AlreadyJoined,
    #[error("only the participant may modify this personal challenge")]
    NotParticipant,
    #[error("only the creator may modify this community challenge")]
    NotCreator,
    #[error("community challenge still has other participants")]
    HasOtherParticipants,
    #[error("start date may not lie in the past")]
    StartDateInPast,
    #[error("end date may not precede the start date")]
    InvalidDateRange,
    #[error(transparent)]
    Badges(#[from] BadgeServiceError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
