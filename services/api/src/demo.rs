use chrono::{Duration, Utc};
use clap::Args;

use crate::cli::ExpireArgs;
use crate::infra::build_services;
use crate::seed::seed_standard_challenges;
use ecotrack::error::AppError;
use ecotrack::workflows::badges::domain::NewBadge;
use ecotrack::workflows::impact::domain::{BottleType, BottleUsage, ChallengeScope};
use ecotrack::workflows::social::domain::NewInvitation;
use ecotrack::workflows::users::domain::NewUser;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of refillable bottle uses to log for the demo user.
    #[arg(long, default_value_t = 10)]
    pub(crate) bottles: u32,
    /// Skip the invitation portion of the demo.
    #[arg(long)]
    pub(crate) skip_invitations: bool,
}

fn startup(err: impl std::fmt::Display, context: &str) -> AppError {
    AppError::Startup(format!("{context}: {err}"))
}

/// Close overdue participations against a freshly seeded store and report the
/// counters. Serves as the scheduler entry point for the expiry sweep.
pub(crate) fn run_expire(args: ExpireArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(Utc::now);
    let services = build_services();
    seed_standard_challenges(services.challenges.as_ref(), as_of - Duration::days(366))
        .map_err(|err| startup(err, "challenge seeding failed"))?;

    let sweep = services
        .challenges
        .complete_due(as_of)
        .map_err(|err| startup(err, "expiry sweep failed"))?;

    println!("Challenge expiry sweep as of {as_of}");
    println!("- {} personal participations completed", sweep.personal_completed);
    println!("- {} community participations completed", sweep.community_completed);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        bottles,
        skip_invitations,
    } = args;

    let now = Utc::now();
    let services = build_services();
    seed_standard_challenges(services.challenges.as_ref(), now)
        .map_err(|err| startup(err, "challenge seeding failed"))?;

    println!("EcoTrack workflow demo");

    let greta = services
        .users
        .register(NewUser {
            username: "greta".to_string(),
            email: "greta@example.com".to_string(),
            password: "compost-heap".to_string(),
        })
        .map_err(|err| startup(err, "registration failed"))?;
    let arne = services
        .users
        .register(NewUser {
            username: "arne".to_string(),
            email: "arne@example.com".to_string(),
            password: "tidal-power".to_string(),
        })
        .map_err(|err| startup(err, "registration failed"))?;
    println!(
        "- Registered {} and {} with hashed credentials",
        greta.username, arne.username
    );

    let weekly = services
        .challenges
        .challenge_by_name("Weekly Warriors")
        .map_err(|err| startup(err, "challenge lookup failed"))?;
    let participation = services
        .challenges
        .join_personal(greta.id, weekly.id, now)
        .map_err(|err| startup(err, "personal join failed"))?;
    println!(
        "- {} joined '{}' ({} eco-points on offer)",
        greta.username, weekly.name, weekly.eco_points
    );

    let record = services
        .impact
        .record_bottle_usage(BottleUsage {
            user_id: greta.id,
            bottle_type: BottleType::Refillable,
            count: bottles,
            scope: Some(ChallengeScope::Personal(participation.id)),
        })
        .map_err(|err| startup(err, "bottle logging failed"))?;
    println!(
        "- Logged {} refillable bottle uses: {:.2} L water, {:.2} kg CO2, {:.2} money saved (score {:.3})",
        bottles,
        record.water_saved,
        record.co2_emissions_prevented,
        record.money_saved,
        record.impact_score
    );

    services
        .badges
        .create_badge(NewBadge {
            name: "First Steps".to_string(),
            eco_points_required: 1,
        })
        .map_err(|err| startup(err, "badge creation failed"))?;

    // Premature completion: 15% of the reward is deducted, then badges are
    // re-checked against the new balance.
    let outcome = services
        .challenges
        .complete_personal_prematurely(greta.id, weekly.id, now + Duration::hours(1))
        .map_err(|err| startup(err, "premature completion failed"))?;
    println!(
        "- {} completed '{}' early: balance {} eco-points, new badges {:?}",
        greta.username, weekly.name, outcome.eco_points, outcome.awarded_badges
    );

    if !skip_invitations {
        let daily = services
            .challenges
            .challenge_by_name("Daily Quick Wins")
            .map_err(|err| startup(err, "challenge lookup failed"))?;
        let invitation = services
            .invitations
            .send(
                NewInvitation {
                    sender: greta.id,
                    recipient: arne.id,
                    personal_challenge: Some(daily.id),
                    community_challenge: None,
                },
                now,
            )
            .map_err(|err| startup(err, "invitation failed"))?;
        let answered = services
            .invitations
            .respond(invitation.id, arne.id, true, now)
            .map_err(|err| startup(err, "invitation response failed"))?;
        println!(
            "- {} invited {} to '{}' -> {}",
            greta.username,
            arne.username,
            daily.name,
            answered.status.label()
        );
    }

    let sweep = services
        .challenges
        .complete_due(now + Duration::days(400))
        .map_err(|err| startup(err, "expiry sweep failed"))?;
    println!(
        "- Expiry sweep closed {} personal and {} community participations",
        sweep.personal_completed, sweep.community_completed
    );

    let leaderboard = services
        .users
        .leaderboard(10)
        .map_err(|err| startup(err, "leaderboard failed"))?;
    println!("Leaderboard:");
    for entry in leaderboard {
        println!("  - {}: {} eco-points", entry.username, entry.eco_points);
    }

    Ok(())
}
