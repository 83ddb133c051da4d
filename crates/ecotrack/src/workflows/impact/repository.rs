use super::domain::{ChallengeScope, ImpactRecord};
use crate::workflows::users::domain::UserId;
use crate::workflows::RepositoryError;

/// Storage abstraction over the impact ledger. One row per user and optional
/// scope.
pub trait ImpactRepository: Send + Sync {
    /// Insert a zeroed row for the scope, assigning its identifier.
    fn create(
        &self,
        user_id: UserId,
        scope: Option<ChallengeScope>,
    ) -> Result<ImpactRecord, RepositoryError>;
    fn fetch(
        &self,
        user_id: UserId,
        scope: Option<ChallengeScope>,
    ) -> Result<Option<ImpactRecord>, RepositoryError>;
    fn update(&self, record: ImpactRecord) -> Result<(), RepositoryError>;
    fn list_for_user(&self, user_id: UserId) -> Result<Vec<ImpactRecord>, RepositoryError>;
}
