use serde::{Deserialize, Serialize};

/// Identifier wrapper for badges.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BadgeId(pub i64);

/// Achievement unlocked once a user's eco-points reach the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: BadgeId,
    pub name: String,
    pub eco_points_required: i64,
}

/// Creation payload for a badge definition.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBadge {
    pub name: String,
    pub eco_points_required: i64,
}
