use super::domain::{NewUserRecord, User, UserId};
use crate::workflows::RepositoryError;

/// Storage abstraction over the user table so services can be exercised in
/// isolation.
pub trait UserRepository: Send + Sync {
    /// Insert a new account, assigning its identifier.
    fn insert(&self, user: NewUserRecord) -> Result<User, RepositoryError>;
    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    /// Lookup by either unique identity column, for duplicate detection.
    fn fetch_by_identity(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepositoryError>;
    fn update(&self, user: User) -> Result<(), RepositoryError>;
    /// Users ordered by descending eco-points, capped at `limit`.
    fn top_by_eco_points(&self, limit: usize) -> Result<Vec<User>, RepositoryError>;
}

/// Opaque credential hashing dependency. The concrete primitive lives outside
/// the core; the binary wires in a bcrypt-backed implementation.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, raw: &str) -> Result<String, CredentialError>;
}

/// Credential processing failure.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential hashing failed: {0}")]
    Hash(String),
}
