//! User accounts: registration, profiles, and the eco-points leaderboard.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{LeaderboardEntry, NewUser, NewUserRecord, User, UserId, UserProfile};
pub use repository::{CredentialError, PasswordHasher, UserRepository};
pub use router::user_router;
pub use service::{UserService, UserServiceError};
