use std::sync::Arc;

use tracing::info;

use super::domain::{LeaderboardEntry, NewUser, NewUserRecord, User, UserId, UserProfile};
use super::repository::{CredentialError, PasswordHasher, UserRepository};
use crate::workflows::RepositoryError;

/// Service composing account storage and the injected credential hasher.
pub struct UserService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> UserService<U, H>
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }

    /// Register a new account. Username and email must both be unused.
    pub fn register(&self, new_user: NewUser) -> Result<User, UserServiceError> {
        let NewUser {
            username,
            email,
            password,
        } = new_user;

        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(UserServiceError::MissingFields);
        }

        if self.users.fetch_by_identity(&username, &email)?.is_some() {
            return Err(UserServiceError::IdentityTaken);
        }

        let password_hash = self.hasher.hash(&password)?;
        let user = self.users.insert(NewUserRecord {
            username,
            email,
            password_hash,
        })?;

        info!(user_id = user.id.0, "registered user");
        Ok(user)
    }

    pub fn profile(&self, user_id: UserId) -> Result<UserProfile, UserServiceError> {
        let user = self
            .users
            .fetch(user_id)?
            .ok_or(UserServiceError::UserNotFound)?;
        Ok(UserProfile::from(&user))
    }

    pub fn eco_points(&self, user_id: UserId) -> Result<i64, UserServiceError> {
        let user = self
            .users
            .fetch(user_id)?
            .ok_or(UserServiceError::UserNotFound)?;
        Ok(user.eco_points)
    }

    /// Replace the stored profile picture reference.
    pub fn update_profile_picture(
        &self,
        user_id: UserId,
        profile_picture: String,
    ) -> Result<UserProfile, UserServiceError> {
        let mut user = self
            .users
            .fetch(user_id)?
            .ok_or(UserServiceError::UserNotFound)?;
        user.profile_picture = Some(profile_picture);
        self.users.update(user.clone())?;
        info!(user_id = user.id.0, "updated profile picture");
        Ok(UserProfile::from(&user))
    }

    /// Top accounts by eco-points for the public leaderboard.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, UserServiceError> {
        let users = self.users.top_by_eco_points(limit)?;
        Ok(users
            .into_iter()
            .map(|user| LeaderboardEntry {
                username: user.username,
                eco_points: user.eco_points,
            })
            .collect())
    }
}

/// Error raised by the user service.
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("username, email, and password are required")]
    MissingFields,
    #[error("username or email already in use")]
    IdentityTaken,
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
