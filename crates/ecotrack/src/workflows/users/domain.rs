use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered users.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UserId(pub i64);

/// Account row shared by every workflow that reads or mutates eco-points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub profile_picture: Option<String>,
    /// Cumulative sustainability score. Never negative; deductions clamp at zero.
    pub eco_points: i64,
    pub password_hash: String,
}

/// Registration payload validated at the boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Insertable account once the credential has been hashed.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Profile view stripped of credentials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub eco_points: i64,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            profile_picture: user.profile_picture.clone(),
            eco_points: user.eco_points,
        }
    }
}

/// One leaderboard line, ranked by descending eco-points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub eco_points: i64,
}
