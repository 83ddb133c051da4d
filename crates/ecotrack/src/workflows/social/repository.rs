use super::domain::{ChallengeInvitation, InvitationId};
use crate::workflows::users::domain::UserId;
use crate::workflows::RepositoryError;

/// Storage abstraction over the invitation table.
pub trait InvitationRepository: Send + Sync {
    /// Insert an invitation, assigning its identifier.
    fn insert(
        &self,
        invitation: ChallengeInvitation,
    ) -> Result<ChallengeInvitation, RepositoryError>;
    fn fetch(&self, id: InvitationId) -> Result<Option<ChallengeInvitation>, RepositoryError>;
    fn update(&self, invitation: ChallengeInvitation) -> Result<(), RepositoryError>;
    /// Invitations still awaiting the recipient's answer.
    fn pending_for(&self, recipient: UserId)
        -> Result<Vec<ChallengeInvitation>, RepositoryError>;
}
