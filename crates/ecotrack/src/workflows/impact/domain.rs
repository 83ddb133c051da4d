use serde::{Deserialize, Serialize};

use crate::workflows::challenges::domain::{CommunityChallengeId, ParticipationId};
use crate::workflows::users::domain::UserId;

/// Identifier wrapper for impact ledger rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ImpactRecordId(pub i64);

/// Annualized savings from switching to reusable bottles, divided down to a
/// per-action figure.
pub const CO2_SAVED_PER_YEAR_KG: f64 = 156.0;
pub const PLASTIC_SAVED_PER_YEAR_KG: f64 = 1.5;
pub const MONEY_SAVED_PER_YEAR: f64 = 308.88;
/// Water is tracked per use rather than per year.
pub const WATER_SAVED_PER_USE_L: f64 = 0.83;

const DAYS_PER_YEAR: f64 = 365.0;

/// Equal weighting across the four tracked metrics.
pub const METRIC_WEIGHT: f64 = 0.25;

/// Per-action baselines each bottle action is scaled against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactBaselines {
    pub co2_per_action: f64,
    pub water_per_action: f64,
    pub plastic_per_action: f64,
    pub money_per_action: f64,
}

impl ImpactBaselines {
    pub fn per_action() -> Self {
        Self {
            co2_per_action: CO2_SAVED_PER_YEAR_KG / DAYS_PER_YEAR,
            water_per_action: WATER_SAVED_PER_USE_L,
            plastic_per_action: PLASTIC_SAVED_PER_YEAR_KG / DAYS_PER_YEAR,
            money_per_action: MONEY_SAVED_PER_YEAR / DAYS_PER_YEAR,
        }
    }
}

/// Composite score normalizing each accumulated metric by its baseline and
/// weighting them equally.
pub fn impact_score(
    baselines: &ImpactBaselines,
    co2: f64,
    water: f64,
    plastic: f64,
    money: f64,
) -> f64 {
    METRIC_WEIGHT * (co2 / baselines.co2_per_action)
        + METRIC_WEIGHT * (water / baselines.water_per_action)
        + METRIC_WEIGHT * (plastic / baselines.plastic_per_action)
        + METRIC_WEIGHT * (money / baselines.money_per_action)
}

/// Kind of bottle action being logged. Factors scale the per-action
/// baselines; a zero factor means the metric is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BottleType {
    Recycled,
    SingleUse,
    Refillable,
}

impl BottleType {
    pub const fn co2_factor(self) -> f64 {
        match self {
            BottleType::Recycled => 0.10,
            BottleType::SingleUse => 0.0,
            BottleType::Refillable => 0.30,
        }
    }

    /// Only refillable use avoids bottled water entirely.
    pub const fn water_factor(self) -> f64 {
        match self {
            BottleType::Refillable => 1.0,
            BottleType::Recycled | BottleType::SingleUse => 0.0,
        }
    }

    /// Single-use consumption counts against the plastic metric.
    pub const fn plastic_factor(self) -> f64 {
        match self {
            BottleType::Recycled => 0.02,
            BottleType::SingleUse => -0.03,
            BottleType::Refillable => 0.0,
        }
    }

    pub const fn money_factor(self) -> f64 {
        match self {
            BottleType::Refillable => 0.15,
            BottleType::Recycled | BottleType::SingleUse => 0.0,
        }
    }
}

/// Which participation a ledger row belongs to. Rows accumulate per user by
/// default; naming a scope splits the action out to that participation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeScope {
    Personal(ParticipationId),
    Community(CommunityChallengeId),
}

/// Accumulated bottle counts and derived metrics for one user, either at the
/// user level or within one participation scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRecord {
    pub id: ImpactRecordId,
    pub user_id: UserId,
    pub scope: Option<ChallengeScope>,
    pub recycled_bottles: u32,
    pub single_use_bottles: u32,
    pub refillable_bottles: u32,
    pub co2_emissions_prevented: f64,
    pub water_saved: f64,
    pub plastic_waste_reduced: f64,
    pub money_saved: f64,
    pub impact_score: f64,
}

impl ImpactRecord {
    pub fn empty(id: ImpactRecordId, user_id: UserId, scope: Option<ChallengeScope>) -> Self {
        Self {
            id,
            user_id,
            scope,
            recycled_bottles: 0,
            single_use_bottles: 0,
            refillable_bottles: 0,
            co2_emissions_prevented: 0.0,
            water_saved: 0.0,
            plastic_waste_reduced: 0.0,
            money_saved: 0.0,
            impact_score: 0.0,
        }
    }

    /// Fold `count` actions of one bottle type into the row and refresh the
    /// composite score.
    pub fn apply(&mut self, bottle_type: BottleType, count: u32, baselines: &ImpactBaselines) {
        let scale = count as f64;
        match bottle_type {
            BottleType::Recycled => self.recycled_bottles += count,
            BottleType::SingleUse => self.single_use_bottles += count,
            BottleType::Refillable => self.refillable_bottles += count,
        }
        self.co2_emissions_prevented +=
            scale * bottle_type.co2_factor() * baselines.co2_per_action;
        self.water_saved += scale * bottle_type.water_factor() * baselines.water_per_action;
        self.plastic_waste_reduced +=
            scale * bottle_type.plastic_factor() * baselines.plastic_per_action;
        self.money_saved += scale * bottle_type.money_factor() * baselines.money_per_action;
        self.rescore(baselines);
    }

    fn rescore(&mut self, baselines: &ImpactBaselines) {
        self.impact_score = impact_score(
            baselines,
            self.co2_emissions_prevented,
            self.water_saved,
            self.plastic_waste_reduced,
            self.money_saved,
        );
    }
}

fn default_count() -> u32 {
    1
}

/// One logged bottle action. With no scope the action lands on the user's
/// own row.
#[derive(Debug, Clone, Deserialize)]
pub struct BottleUsage {
    pub user_id: UserId,
    pub bottle_type: BottleType,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub scope: Option<ChallengeScope>,
}
