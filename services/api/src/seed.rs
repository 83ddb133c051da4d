use chrono::{DateTime, Duration, Utc};
use tracing::info;

use ecotrack::workflows::badges::repository::BadgeRepository;
use ecotrack::workflows::challenges::domain::NewChallenge;
use ecotrack::workflows::challenges::repository::ChallengeRepository;
use ecotrack::workflows::challenges::{ChallengeService, ChallengeServiceError};
use ecotrack::workflows::users::repository::UserRepository;

const STANDARD_CHALLENGES: [(&str, &str, i64, i64); 4] = [
    (
        "Daily Quick Wins",
        "Small sustainable actions you can finish in a day",
        5,
        1,
    ),
    (
        "Weekly Warriors",
        "Keep your eco habits going for a full week",
        50,
        7,
    ),
    (
        "Monthly Masters",
        "A month of consistent sustainable choices",
        200,
        30,
    ),
    (
        "Yearly Heroes",
        "Commit to a year of lasting impact",
        1000,
        365,
    ),
];

/// Seed the standard challenge catalog. Challenges that already exist are
/// left untouched.
pub(crate) fn seed_standard_challenges<R, B, U>(
    service: &ChallengeService<R, B, U>,
    now: DateTime<Utc>,
) -> Result<(), ChallengeServiceError>
where
    R: ChallengeRepository + 'static,
    B: BadgeRepository + 'static,
    U: UserRepository + 'static,
{
    for (name, description, eco_points, days) in STANDARD_CHALLENGES {
        let result = service.create_challenge(NewChallenge {
            name: name.to_string(),
            description: description.to_string(),
            eco_points,
            start_date: now,
            end_date: now + Duration::days(days),
        });
        match result {
            Ok(challenge) => info!(challenge = %challenge.name, "seeded standard challenge"),
            Err(ChallengeServiceError::DuplicateName) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(())
}
