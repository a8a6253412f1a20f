//! Season Lifecycle Integration Tests
//!
//! These tests drive season rollover, crash recovery, and startup
//! hydration through a full engine over the in-memory stores.
//!
//! Run with: cargo test -p integration-tests --test lifecycle_tests

use integration_tests::{fixtures::*, TestEngine};
use podium_core::{
    ActivityRepository, EngineEvent, Horizon, MemberActivity, Points, SeasonRepository,
    SeasonStatus, Snowflake,
};

/// A stored ledger row as a crashed process would have left it
fn stored_row(guild: Snowflake, member: Snowflake, points: f64) -> MemberActivity {
    let mut row = MemberActivity::new(guild, member);
    row.credit(Points::new(points), true);
    row
}

// ============================================================================
// Season Rollover Tests
// ============================================================================

#[tokio::test]
async fn test_due_season_rolls_over() {
    let harness = TestEngine::idle().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);
    let closed_id = Snowflake::new(900);

    harness.seed_due_season(closed_id, guild).await.unwrap();
    harness.engine.hydrate().await.unwrap();
    harness
        .engine
        .record(at_hour(group_voice_tick(guild, member, 5.0), 19))
        .unwrap();

    let mut events = harness.engine.subscribe();
    assert_eq!(harness.engine.sweep(), 1);

    // Season board resets, lifetime and voice time survive
    assert_eq!(
        harness.engine.points_of(guild, member, Horizon::Season).unwrap(),
        Points::ZERO
    );
    assert_eq!(
        harness.engine.points_of(guild, member, Horizon::Lifetime).unwrap(),
        Points::new(14.0)
    );
    assert_eq!(harness.engine.voice_seconds_of(guild, member).unwrap(), 300);
    assert_eq!(harness.engine.rank_of(guild, member, Horizon::Season).unwrap(), None);
    assert_eq!(
        harness.engine.rank_of(guild, member, Horizon::Lifetime).unwrap(),
        Some((1, 1))
    );

    match events.try_recv().unwrap() {
        EngineEvent::SeasonRolledOver(event) => {
            assert_eq!(event.guild_id, guild);
            assert_eq!(event.closed_season_id, closed_id);
            assert_ne!(event.new_season_id, closed_id);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_sweep_after_rollover_is_a_no_op() {
    let harness = TestEngine::idle().unwrap();
    let guild = unique_guild();
    let closed_id = Snowflake::new(900);

    harness.seed_due_season(closed_id, guild).await.unwrap();
    harness.engine.hydrate().await.unwrap();

    assert_eq!(harness.engine.sweep(), 1);
    assert_eq!(harness.engine.sweep(), 0);
    assert_eq!(harness.engine.sweep(), 0);
}

#[tokio::test]
async fn test_rollover_is_durably_recorded() {
    let harness = TestEngine::idle().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);
    let closed_id = Snowflake::new(900);

    harness.seed_due_season(closed_id, guild).await.unwrap();
    harness.engine.hydrate().await.unwrap();
    harness
        .engine
        .record(at_hour(group_voice_tick(guild, member, 5.0), 19))
        .unwrap();
    assert_eq!(harness.engine.sweep(), 1);

    // Start the workers and let the queued writes drain
    harness.engine.start();
    harness
        .wait_for_season_status(guild, closed_id, SeasonStatus::Archived)
        .await
        .unwrap();
    let row = harness
        .wait_for_season_points(guild, member, Points::ZERO)
        .await
        .unwrap();
    assert_eq!(row.lifetime_points, Points::new(14.0));

    // Exactly one Active season remains on record
    let seasons = harness.season_repo.find_by_guild(guild).await.unwrap();
    assert_eq!(seasons.len(), 2);
    assert_eq!(seasons[0].status, SeasonStatus::Active);
    assert_ne!(seasons[0].id, closed_id);
}

#[tokio::test]
async fn test_accrual_continues_into_the_new_season() {
    let harness = TestEngine::idle().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);

    harness.seed_due_season(Snowflake::new(900), guild).await.unwrap();
    harness.engine.hydrate().await.unwrap();
    harness
        .engine
        .record(at_hour(solo_voice_tick(guild, member, 10.0), 12))
        .unwrap();
    assert_eq!(harness.engine.sweep(), 1);

    harness
        .engine
        .record(at_hour(solo_voice_tick(guild, member, 10.0), 12))
        .unwrap();

    assert_eq!(
        harness.engine.points_of(guild, member, Horizon::Season).unwrap(),
        Points::new(1.0)
    );
    assert_eq!(
        harness.engine.points_of(guild, member, Horizon::Lifetime).unwrap(),
        Points::new(2.0)
    );
}

// ============================================================================
// Recovery Tests
// ============================================================================

#[tokio::test]
async fn test_restart_resumes_interrupted_rollover() {
    let harness = TestEngine::idle().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);
    let stuck_id = Snowflake::new(900);

    // A rollover that crashed right after fencing the season
    harness.seed_due_season(stuck_id, guild).await.unwrap();
    harness
        .season_repo
        .update_status(stuck_id, SeasonStatus::Finalizing)
        .await
        .unwrap();
    harness
        .activity_repo
        .upsert(&stored_row(guild, member, 14.0))
        .await
        .unwrap();

    let restarted = harness.restart().await.unwrap();

    // The archive finished and a fresh season opened
    let seasons = harness.season_repo.find_by_guild(guild).await.unwrap();
    assert_eq!(seasons.len(), 2);
    assert_eq!(seasons[0].status, SeasonStatus::Active);
    assert_ne!(seasons[0].id, stuck_id);
    assert_eq!(seasons[1].id, stuck_id);
    assert_eq!(seasons[1].status, SeasonStatus::Archived);

    assert_eq!(
        restarted.points_of(guild, member, Horizon::Season).unwrap(),
        Points::ZERO
    );
    assert_eq!(
        restarted.points_of(guild, member, Horizon::Lifetime).unwrap(),
        Points::new(14.0)
    );
}

#[tokio::test]
async fn test_recovery_is_idempotent_across_restarts() {
    let harness = TestEngine::idle().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);
    let stuck_id = Snowflake::new(900);

    harness.seed_due_season(stuck_id, guild).await.unwrap();
    harness
        .season_repo
        .update_status(stuck_id, SeasonStatus::Finalizing)
        .await
        .unwrap();
    harness
        .activity_repo
        .upsert(&stored_row(guild, member, 1.0))
        .await
        .unwrap();

    let first = harness.restart().await.unwrap();
    let second = harness.restart().await.unwrap();

    // Replaying the recovery changes nothing further
    assert_eq!(
        first.points_of(guild, member, Horizon::Lifetime).unwrap(),
        second.points_of(guild, member, Horizon::Lifetime).unwrap()
    );
    let seasons = harness.season_repo.find_by_guild(guild).await.unwrap();
    assert_eq!(seasons.len(), 2);
    let archived = seasons
        .iter()
        .filter(|season| season.status == SeasonStatus::Archived)
        .count();
    assert_eq!(archived, 1);
}

// ============================================================================
// Hydration Tests
// ============================================================================

#[tokio::test]
async fn test_restart_rebuilds_rankings_from_rows() {
    let harness = TestEngine::start().unwrap();
    let guild = unique_guild();
    let engine = &harness.engine;

    for (member, ticks) in [(10, 3), (11, 1), (12, 2)] {
        for _ in 0..ticks {
            engine
                .record(at_hour(solo_voice_tick(guild, Snowflake::new(member), 10.0), 12))
                .unwrap();
        }
    }
    // Member 12's second tick is the last queued write
    harness
        .wait_for_season_points(guild, Snowflake::new(12), Points::new(2.0))
        .await
        .unwrap();

    let restarted = harness.restart().await.unwrap();

    let board = restarted.top_n(guild, Horizon::Season, 10).unwrap();
    let order: Vec<i64> = board.iter().map(|entry| entry.member_id.into_inner()).collect();
    assert_eq!(order, [10, 12, 11]);
    assert_eq!(
        restarted.rank_of(guild, Snowflake::new(12), Horizon::Season).unwrap(),
        Some((2, 3))
    );
}

#[tokio::test]
async fn test_first_activity_opens_and_stores_a_season() {
    let harness = TestEngine::start().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);

    harness
        .engine
        .record(at_hour(message(guild, member), 12))
        .unwrap();
    harness.wait_for_row(guild, member).await.unwrap();

    let seasons = harness.season_repo.find_by_guild(guild).await.unwrap();
    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0].status, SeasonStatus::Active);
    assert_eq!(seasons[0].guild_id, guild);
}
