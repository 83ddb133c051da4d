use std::sync::Arc;

use tracing::info;

use super::domain::{Badge, NewBadge};
use super::repository::BadgeRepository;
use crate::workflows::users::domain::{User, UserId};
use crate::workflows::users::repository::UserRepository;
use crate::workflows::RepositoryError;

/// Service over badge definitions and awards.
pub struct BadgeService<B, U> {
    badges: Arc<B>,
    users: Arc<U>,
}

impl<B, U> BadgeService<B, U>
where
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(badges: Arc<B>, users: Arc<U>) -> Self {
        Self { badges, users }
    }

    /// Define a new badge. Name must be non-empty, threshold positive, and
    /// the name unused.
    pub fn create_badge(&self, new_badge: NewBadge) -> Result<Badge, BadgeServiceError> {
        if new_badge.name.trim().is_empty() || new_badge.eco_points_required <= 0 {
            return Err(BadgeServiceError::MissingFields);
        }
        if self.badges.fetch_by_name(&new_badge.name)?.is_some() {
            return Err(BadgeServiceError::DuplicateName);
        }
        let badge = self.badges.insert(new_badge)?;
        info!(badge = %badge.name, "created badge");
        Ok(badge)
    }

    /// Manually grant a named badge to a user.
    pub fn award_named(&self, user_id: UserId, badge_name: &str) -> Result<(), BadgeServiceError> {
        let user = self
            .users
            .fetch(user_id)?
            .ok_or(BadgeServiceError::UserNotFound)?;
        let badge = self
            .badges
            .fetch_by_name(badge_name)?
            .ok_or(BadgeServiceError::BadgeNotFound)?;
        match self.badges.award(user.id, badge.id) {
            Ok(()) => {
                info!(user_id = user.id.0, badge = %badge.name, "awarded badge");
                Ok(())
            }
            Err(RepositoryError::Conflict) => Err(BadgeServiceError::AlreadyAwarded),
            Err(other) => Err(other.into()),
        }
    }

    /// Award every badge the user's balance now qualifies for but does not
    /// hold. Idempotent; returns the names granted this pass.
    pub fn evaluate_and_award(&self, user: &User) -> Result<Vec<String>, BadgeServiceError> {
        let mut granted = Vec::new();
        for badge in self.badges.eligible(user.eco_points)? {
            if self.badges.is_awarded(user.id, badge.id)? {
                continue;
            }
            match self.badges.award(user.id, badge.id) {
                Ok(()) => {
                    info!(user_id = user.id.0, badge = %badge.name, "awarded badge");
                    granted.push(badge.name);
                }
                // A concurrent evaluation already granted it.
                Err(RepositoryError::Conflict) => {}
                Err(other) => return Err(other.into()),
            }
        }
        Ok(granted)
    }

    pub fn badges_for_user(&self, user_id: UserId) -> Result<Vec<Badge>, BadgeServiceError> {
        if self.users.fetch(user_id)?.is_none() {
            return Err(BadgeServiceError::UserNotFound);
        }
        Ok(self.badges.awarded_to(user_id)?)
    }
}

/// Error raised by the badge service.
#[derive(Debug, thiserror::Error)]
pub enum BadgeServiceError {
    #[error("badge name and a positive eco-points threshold are required")]
    MissingFields,
    #[error("badge name already in use")]
    DuplicateName,
    #[error("user not found")]
    UserNotFound,
    #[error("badge not found")]
    BadgeNotFound,
    #[error("badge already awarded")]
    AlreadyAwarded,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
