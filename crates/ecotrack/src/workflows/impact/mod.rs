//! Environmental impact ledger: bottle actions scaled against per-action
//! baselines into four metrics and a weighted composite score.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    impact_score, BottleType, BottleUsage, ChallengeScope, ImpactBaselines, ImpactRecord,
    ImpactRecordId, CO2_SAVED_PER_YEAR_KG, METRIC_WEIGHT, MONEY_SAVED_PER_YEAR,
    PLASTIC_SAVED_PER_YEAR_KG, WATER_SAVED_PER_USE_L,
};
pub use repository::ImpactRepository;
pub use router::impact_router;
pub use service::{ImpactService, ImpactServiceError};
