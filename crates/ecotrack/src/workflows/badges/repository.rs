use super::domain::{Badge, BadgeId, NewBadge};
use crate::workflows::users::domain::UserId;
use crate::workflows::RepositoryError;

/// Storage abstraction over badge definitions and the user-badge link table.
pub trait BadgeRepository: Send + Sync {
    /// Insert a definition, assigning its identifier.
    fn insert(&self, badge: NewBadge) -> Result<Badge, RepositoryError>;
    /// Name lookup for duplicate detection.
    fn fetch_by_name(&self, name: &str) -> Result<Option<Badge>, RepositoryError>;
    /// Definitions whose threshold is at or below `eco_points`.
    fn eligible(&self, eco_points: i64) -> Result<Vec<Badge>, RepositoryError>;
    fn awarded_to(&self, user_id: UserId) -> Result<Vec<Badge>, RepositoryError>;
    fn is_awarded(&self, user_id: UserId, badge_id: BadgeId) -> Result<bool, RepositoryError>;
    /// Record an award. Fails with `Conflict` when the user already holds it.
    fn award(&self, user_id: UserId, badge_id: BadgeId) -> Result<(), RepositoryError>;
}
