use std::sync::Arc;

use tracing::info;

use super::domain::{BottleUsage, ImpactBaselines, ImpactRecord};
use super::repository::ImpactRepository;
use crate::workflows::users::domain::UserId;
use crate::workflows::users::repository::UserRepository;
use crate::workflows::RepositoryError;

/// Service maintaining the per-scope impact ledger. Rows are created lazily
/// on the first logged action for a scope.
pub struct ImpactService<P, U> {
    records: Arc<P>,
    users: Arc<U>,
    baselines: ImpactBaselines,
}

impl<P, U> ImpactService<P, U>
where
    P: ImpactRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(records: Arc<P>, users: Arc<U>) -> Self {
        Self {
            records,
            users,
            baselines: ImpactBaselines::per_action(),
        }
    }

    /// Fold a bottle action into the user's ledger row for the scope.
    pub fn record_bottle_usage(
        &self,
        usage: BottleUsage,
    ) -> Result<ImpactRecord, ImpactServiceError> {
        if usage.count == 0 {
            return Err(ImpactServiceError::InvalidCount);
        }
        if self.users.fetch(usage.user_id)?.is_none() {
            return Err(ImpactServiceError::UserNotFound);
        }

        let mut record = match self.records.fetch(usage.user_id, usage.scope)? {
            Some(record) => record,
            None => self.records.create(usage.user_id, usage.scope)?,
        };
        record.apply(usage.bottle_type, usage.count, &self.baselines);
        self.records.update(record.clone())?;

        info!(
            user_id = usage.user_id.0,
            count = usage.count,
            score = record.impact_score,
            "recorded bottle usage"
        );
        Ok(record)
    }

    /// Every ledger row the user has accumulated, across all scopes.
    pub fn impact_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ImpactRecord>, ImpactServiceError> {
        if self.users.fetch(user_id)?.is_none() {
            return Err(ImpactServiceError::UserNotFound);
        }
        Ok(self.records.list_for_user(user_id)?)
    }
}

/// Error raised by the impact service.
#[derive(Debug, thiserror::Error)]
pub enum ImpactServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("count must be at least one")]
    InvalidCount,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
