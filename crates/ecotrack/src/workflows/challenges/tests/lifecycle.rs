use chrono::Duration;

use super::common::*;
use crate::workflows::badges::domain::NewBadge;
use crate::workflows::challenges::domain::PersonalReschedule;
use crate::workflows::challenges::service::ChallengeServiceError;
use crate::workflows::users::repository::UserRepository;

#[test]
fn create_rejects_duplicate_name() {
    let fixture = fixture();
    fixture
        .service
        .create_challenge(weekly_challenge("Weekly Warriors", 50))
        .expect("first template");
    let duplicate = fixture
        .service
        .create_challenge(weekly_challenge("Weekly Warriors", 75));
    assert!(matches!(duplicate, Err(ChallengeServiceError::DuplicateName)));
}

#[test]
fn create_rejects_inverted_window() {
    let fixture = fixture();
    let mut challenge = weekly_challenge("Backwards", 50);
    challenge.end_date = challenge.start_date - Duration::days(1);
    let result = fixture.service.create_challenge(challenge);
    assert!(matches!(result, Err(ChallengeServiceError::InvalidDateRange)));
}

#[test]
fn create_accepts_single_day_window() {
    let fixture = fixture();
    let mut challenge = weekly_challenge("Sprint", 50);
    challenge.end_date = challenge.start_date;
    fixture
        .service
        .create_challenge(challenge)
        .expect("window may start and end on the same instant");
}

#[test]
fn repeat_joins_open_parallel_runs() {
    let fixture = fixture();
    let user = register(&fixture, "greta", 0);
    let challenge = fixture
        .service
        .create_challenge(weekly_challenge("Weekly Warriors", 50))
        .expect("template");

    let first = fixture
        .service
        .join_personal(user.id, challenge.id, now())
        .expect("first join");
    let second = fixture
        .service
        .join_personal(user.id, challenge.id, now())
        .expect("repeat join");
    assert_ne!(first.id, second.id);

    let runs = fixture.service.list_personal(user.id).expect("list");
    assert_eq!(runs.len(), 2);
}

#[test]
fn finished_run_does_not_block_a_new_one() {
    let fixture = fixture();
    let user = register(&fixture, "greta", 100);
    let challenge = fixture
        .service
        .create_challenge(weekly_challenge("Weekly Warriors", 50))
        .expect("template");

    fixture
        .service
        .join_personal(user.id, challenge.id, now())
        .expect("join");
    fixture
        .service
        .complete_personal_prematurely(user.id, challenge.id, now() + Duration::days(1))
        .expect("complete");

    fixture
        .service
        .join_personal(user.id, challenge.id, now() + Duration::days(2))
        .expect("rejoin after completion");
}

#[test]
fn premature_completion_deducts_fifteen_percent() {
    let fixture = fixture();
    let user = register(&fixture, "greta", 100);
    let challenge = fixture
        .service
        .create_challenge(weekly_challenge("Weekly Warriors", 100))
        .expect("template");
    fixture
        .service
        .join_personal(user.id, challenge.id, now())
        .expect("join");

    let outcome = fixture
        .service
        .complete_personal_prematurely(user.id, challenge.id, now() + Duration::days(1))
        .expect("complete");
    assert_eq!(outcome.eco_points, 85);

    let stored = fixture
        .users
        .fetch(user.id)
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.eco_points, 85);
}

#[test]
fn penalty_clamps_balance_at_zero() {
    let fixture = fixture();
    let user = register(&fixture, "greta", 5);
    let challenge = fixture
        .service
        .create_challenge(weekly_challenge("Weekly Warriors", 100))
        .expect("template");
    fixture
        .service
        .join_personal(user.id, challenge.id, now())
        .expect("join");

    let outcome = fixture
        .service
        .complete_personal_prematurely(user.id, challenge.id, now() + Duration::days(1))
        .expect("complete");
    assert_eq!(outcome.eco_points, 0);
}

#[test]
fn premature_completion_can_trigger_badges() {
    let fixture = fixture();
    let user = register(&fixture, "greta", 100);
    fixture
        .badges
        .create_badge(NewBadge {
            name: "Survivor".to_string(),
            eco_points_required: 80,
        })
        .expect("badge");
    let challenge = fixture
        .service
        .create_challenge(weekly_challenge("Weekly Warriors", 100))
        .expect("template");
    fixture
        .service
        .join_personal(user.id, challenge.id, now())
        .expect("join");

    let outcome = fixture
        .service
        .complete_personal_prematurely(user.id, challenge.id, now() + Duration::days(1))
        .expect("complete");
    assert_eq!(outcome.awarded_badges, vec!["Survivor".to_string()]);
}

#[test]
fn deleting_finished_run_deducts_ten_percent() {
    let fixture = fixture();
    let user = register(&fixture, "greta", 100);
    let challenge = fixture
        .service
        .create_challenge(weekly_challenge("Weekly Warriors", 100))
        .expect("template");
    fixture
        .service
        .join_personal(user.id, challenge.id, now())
        .expect("join");
    fixture
        .service
        .complete_personal_prematurely(user.id, challenge.id, now() + Duration::days(1))
        .expect("complete");

    // 100 - 15 premature, then -10 for deleting the finished run.
    let remaining = fixture
        .service
        .delete_personal(user.id, challenge.id)
        .expect("delete");
    assert_eq!(remaining, 75);
}

#[test]
fn deleting_open_run_is_free() {
    let fixture = fixture();
    let user = register(&fixture, "greta", 100);
    let challenge = fixture
        .service
        .create_challenge(weekly_challenge("Weekly Warriors", 100))
        .expect("template");
    fixture
        .service
        .join_personal(user.id, challenge.id, now())
        .expect("join");

    let remaining = fixture
        .service
        .delete_personal(user.id, challenge.id)
        .expect("delete");
    assert_eq!(remaining, 100);
    assert!(fixture
        .service
        .list_personal(user.id)
        .expect("list")
        .is_empty());
}

#[test]
fn reschedule_rejects_start_in_past() {
    let fixture = fixture();
    let user = register(&fixture, "greta", 0);
    let challenge = fixture
        .service
        .create_challenge(weekly_challenge("Weekly Warriors", 50))
        .expect("template");
    let participation = fixture
        .service
        .join_personal(user.id, challenge.id, now())
        .expect("join");

    let result = fixture.service.edit_personal(
        participation.id,
        user.id,
        PersonalReschedule {
            start_date: Some(now() - Duration::days(1)),
            end_date: None,
        },
        now(),
    );
    assert!(matches!(result, Err(ChallengeServiceError::StartDateInPast)));
}

#[test]
fn reschedule_by_another_user_is_forbidden() {
    let fixture = fixture();
    let owner = register(&fixture, "greta", 0);
    let intruder = register(&fixture, "arne", 0);
    let challenge = fixture
        .service
        .create_challenge(weekly_challenge("Weekly Warriors", 50))
        .expect("template");
    let participation = fixture
        .service
        .join_personal(owner.id, challenge.id, now())
        .expect("join");

    let result = fixture.service.edit_personal(
        participation.id,
        intruder.id,
        PersonalReschedule {
            start_date: Some(now() + Duration::days(1)),
            end_date: None,
        },
        now(),
    );
    assert!(matches!(result, Err(ChallengeServiceError::NotParticipant)));
}

#[test]
fn expiry_sweep_closes_due_runs_without_penalty() {
    let fixture = fixture();
    let user = register(&fixture, "greta", 100);
    let challenge = fixture
        .service
        .create_challenge(weekly_challenge("Weekly Warriors", 100))
        .expect("template");
    fixture
        .service
        .join_personal(user.id, challenge.id, now())
        .expect("join");

    let early = fixture
        .service
        .complete_due(now() + Duration::days(1))
        .expect("sweep");
    assert_eq!(early.personal_completed, 0);

    let due = fixture
        .service
        .complete_due(now() + Duration::days(8))
        .expect("sweep");
    assert_eq!(due.personal_completed, 1);

    let views = fixture.service.list_personal(user.id).expect("list");
    assert_eq!(views[0].status, "Completed");
    let stored = fixture
        .users
        .fetch(user.id)
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.eco_points, 100);

    // Idempotent: nothing left to close on the second pass.
    let repeat = fixture
        .service
        .complete_due(now() + Duration::days(9))
        .expect("sweep");
    assert_eq!(repeat.personal_completed, 0);
}
