//! Badge definitions and awards keyed off eco-point thresholds.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Badge, BadgeId, NewBadge};
pub use repository::BadgeRepository;
pub use router::badge_router;
pub use service::{BadgeService, BadgeServiceError};
