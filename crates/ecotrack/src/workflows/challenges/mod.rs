//! Challenge templates and the personal and community participation
//! lifecycles, including penalty arithmetic and the expiry sweep.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    deduct_penalty, Challenge, ChallengeId, ChallengeStatusEntry, ChallengeUpdate,
    CommunityChallenge, CommunityChallengeDetails, CommunityChallengeId, CommunityParticipation,
    CompletionOutcome, ExpirySweep, NewChallenge, ParticipationId, ParticipationStatus,
    PersonalChallengeView, PersonalParticipation, PersonalReschedule,
    ABANDONED_PROGRESS_PENALTY, PREMATURE_COMPLETION_PENALTY,
};
pub use repository::ChallengeRepository;
pub use router::challenge_router;
pub use service::{ChallengeService, ChallengeServiceError};
