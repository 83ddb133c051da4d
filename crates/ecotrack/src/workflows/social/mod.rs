//! Challenge invitations between users.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{ChallengeInvitation, InvitationId, InvitationStatus, NewInvitation};
pub use repository::InvitationRepository;
pub use router::invitation_router;
pub use service::{InvitationService, InvitationServiceError};
