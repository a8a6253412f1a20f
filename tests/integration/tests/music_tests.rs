//! Music Session Integration Tests
//!
//! These tests drive queue management, repeat modes, rank-gated
//! controls, and concurrent control races through a full engine.
//!
//! Run with: cargo test -p integration-tests --test music_tests

use std::sync::Arc;

use integration_tests::{fixtures::*, TestEngine};
use podium_core::{EngineError, EngineEvent, Horizon, RepeatMode, SessionEndReason, Snowflake};
use podium_engine::{Advance, PlayOutcome};

// ============================================================================
// Queue Tests
// ============================================================================

#[tokio::test]
async fn test_play_starts_an_idle_guild() {
    let harness = TestEngine::start().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);
    let mut events = harness.engine.subscribe();

    let outcome = harness.engine.play(guild, member, "first song").await.unwrap();
    match outcome {
        PlayOutcome::Started(track) => {
            assert_eq!(track.title, "first song");
            assert_eq!(track.requester_id, member);
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let view = harness.engine.queue_view(guild).unwrap();
    assert_eq!(view.current.title, "first song");
    assert!(view.upcoming.is_empty());

    match events.try_recv().unwrap() {
        EngineEvent::TrackStarted(event) => {
            assert_eq!(event.guild_id, guild);
            assert_eq!(event.requester_id, member);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_enqueue_appends_while_playing() {
    let harness = TestEngine::start().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);
    let engine = &harness.engine;

    engine.play(guild, member, "first song").await.unwrap();
    let outcome = engine.play(guild, member, "second song").await.unwrap();
    match outcome {
        PlayOutcome::Enqueued { position, ref track } => {
            assert_eq!(position, 0);
            assert_eq!(track.title, "second song");
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let view = engine.queue_view(guild).unwrap();
    assert_eq!(view.upcoming.len(), 1);
    assert_eq!(view.upcoming[0].title, "second song");
}

#[tokio::test]
async fn test_skip_advances_then_drains() {
    let harness = TestEngine::start().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);
    let engine = &harness.engine;

    engine.play(guild, member, "first song").await.unwrap();
    engine.play(guild, member, "second song").await.unwrap();
    let mut events = engine.subscribe();

    match engine.skip(guild, member).unwrap() {
        Advance::Next(track) => assert_eq!(track.title, "second song"),
        Advance::Drained => panic!("queue drained early"),
    }
    match events.try_recv().unwrap() {
        EngineEvent::TrackStarted(event) => assert_eq!(event.title, "second song"),
        other => panic!("unexpected event {other:?}"),
    }

    assert!(matches!(engine.skip(guild, member).unwrap(), Advance::Drained));
    match events.try_recv().unwrap() {
        EngineEvent::SessionEnded(event) => {
            assert_eq!(event.reason, SessionEndReason::Drained);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(matches!(
        engine.queue_view(guild),
        Err(EngineError::SessionNotFound { .. })
    ));
}

#[tokio::test]
async fn test_remove_at_uses_one_based_positions() {
    let harness = TestEngine::start().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);
    let engine = &harness.engine;

    engine.play(guild, member, "playing").await.unwrap();
    engine.play(guild, member, "first waiting").await.unwrap();
    engine.play(guild, member, "second waiting").await.unwrap();

    let removed = engine.remove_at(guild, member, 1).unwrap();
    assert_eq!(removed.title, "first waiting");
    let view = engine.queue_view(guild).unwrap();
    assert_eq!(view.upcoming.len(), 1);

    assert!(matches!(
        engine.remove_at(guild, member, 0),
        Err(EngineError::PositionOutOfRange { .. })
    ));
    assert!(matches!(
        engine.remove_at(guild, member, 99),
        Err(EngineError::PositionOutOfRange { .. })
    ));
}

#[tokio::test]
async fn test_music_ops_without_a_session_are_rejected() {
    let harness = TestEngine::start().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);

    assert!(matches!(
        harness.engine.skip(guild, member),
        Err(EngineError::SessionNotFound { .. })
    ));
    assert!(matches!(
        harness.engine.stop_session(guild, member),
        Err(EngineError::SessionNotFound { .. })
    ));
    assert!(harness.engine.track_finished(guild).is_none());
}

// ============================================================================
// Repeat Mode Tests
// ============================================================================

#[tokio::test]
async fn test_queue_repeat_rotates_finished_tracks() {
    let harness = TestEngine::start().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);
    let engine = &harness.engine;

    engine.play(guild, member, "a").await.unwrap();
    engine.play(guild, member, "b").await.unwrap();
    engine.set_repeat(guild, member, RepeatMode::Queue).unwrap();

    let mut titles = Vec::new();
    for _ in 0..4 {
        match engine.track_finished(guild).unwrap() {
            Advance::Next(track) => titles.push(track.title),
            Advance::Drained => panic!("queue repeat must not drain"),
        }
    }
    assert_eq!(titles, ["b", "a", "b", "a"]);
}

#[tokio::test]
async fn test_track_repeat_replays_the_current_track() {
    let harness = TestEngine::start().unwrap();
    let guild = unique_guild();
    let member = Snowflake::new(10);
    let engine = &harness.engine;

    engine.play(guild, member, "looped").await.unwrap();
    engine.set_repeat(guild, member, RepeatMode::Track).unwrap();

    for _ in 0..3 {
        match engine.track_finished(guild).unwrap() {
            Advance::Next(track) => assert_eq!(track.title, "looped"),
            Advance::Drained => panic!("track repeat must not drain"),
        }
    }
}

// ============================================================================
// Control Gating Tests
// ============================================================================

#[tokio::test]
async fn test_outranked_member_cannot_skip() {
    let harness = TestEngine::start().unwrap();
    let guild = unique_guild();
    let engine = &harness.engine;
    let leader = Snowflake::new(10);
    let trailer = Snowflake::new(11);

    engine
        .record(at_hour(solo_voice_tick(guild, leader, 20.0), 12))
        .unwrap();
    engine
        .record(at_hour(solo_voice_tick(guild, trailer, 10.0), 12))
        .unwrap();
    engine.play(guild, leader, "leader's pick").await.unwrap();

    let mut events = engine.subscribe();
    let denied = engine.skip(guild, trailer);
    assert!(matches!(denied, Err(EngineError::PermissionDenied { .. })));

    match events.try_recv().unwrap() {
        EngineEvent::PermissionDenied(event) => {
            assert_eq!(event.guild_id, guild);
            assert_eq!(event.actor_id, trailer);
            assert_eq!(event.holder_id, leader);
            assert_eq!(event.operation, "skip");
        }
        other => panic!("unexpected event {other:?}"),
    }

    // The session is untouched
    assert_eq!(engine.queue_view(guild).unwrap().current.title, "leader's pick");
    // The leader can control the trailer's additions, not vice versa
    assert!(engine.can_control(guild, leader, trailer).unwrap());
}

#[tokio::test]
async fn test_rank_shift_transfers_control() {
    let harness = TestEngine::start().unwrap();
    let guild = unique_guild();
    let engine = &harness.engine;
    let early_leader = Snowflake::new(10);
    let challenger = Snowflake::new(11);

    engine
        .record(at_hour(solo_voice_tick(guild, early_leader, 10.0), 12))
        .unwrap();
    engine.play(guild, early_leader, "incumbent").await.unwrap();

    assert!(matches!(
        engine.skip(guild, challenger),
        Err(EngineError::PermissionDenied { .. })
    ));

    // The challenger out-earns the holder and takes the top rank
    for _ in 0..3 {
        engine
            .record(at_hour(solo_voice_tick(guild, challenger, 10.0), 12))
            .unwrap();
    }
    assert_eq!(
        engine.rank_of(guild, challenger, Horizon::Season).unwrap(),
        Some((1, 2))
    );
    assert!(matches!(engine.skip(guild, challenger).unwrap(), Advance::Drained));
}

#[tokio::test]
async fn test_anyone_may_enqueue() {
    let harness = TestEngine::start().unwrap();
    let guild = unique_guild();
    let engine = &harness.engine;
    let leader = Snowflake::new(10);
    let newcomer = Snowflake::new(11);

    engine
        .record(at_hour(solo_voice_tick(guild, leader, 10.0), 12))
        .unwrap();
    engine.play(guild, leader, "leader's pick").await.unwrap();

    // No rank needed to add to the queue
    let outcome = engine.play(guild, newcomer, "newcomer's pick").await.unwrap();
    assert!(matches!(outcome, PlayOutcome::Enqueued { position: 0, .. }));
}

// ============================================================================
// Race and Isolation Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stop_and_skip_race_tears_down_once() {
    for _ in 0..20 {
        let harness = Arc::new(TestEngine::start().unwrap());
        let guild = unique_guild();
        let member = Snowflake::new(10);
        harness.engine.play(guild, member, "contended").await.unwrap();

        let stopper = {
            let harness = Arc::clone(&harness);
            tokio::spawn(async move { harness.engine.stop_session(guild, member) })
        };
        let skipper = {
            let harness = Arc::clone(&harness);
            tokio::spawn(async move { harness.engine.skip(guild, member) })
        };
        let stop_result = stopper.await.unwrap();
        let skip_result = skipper.await.unwrap();

        // Whoever locks first tears the session down; the loser sees no
        // session at all
        match (&stop_result, &skip_result) {
            (Ok(()), Err(EngineError::SessionNotFound { .. })) => {}
            (Err(EngineError::SessionNotFound { .. }), Ok(Advance::Drained)) => {}
            other => panic!("unexpected race outcome {other:?}"),
        }
        assert!(matches!(
            harness.engine.queue_view(guild),
            Err(EngineError::SessionNotFound { .. })
        ));
    }
}

#[tokio::test]
async fn test_sessions_are_isolated_per_guild() {
    let harness = TestEngine::start().unwrap();
    let engine = &harness.engine;
    let first_guild = unique_guild();
    let second_guild = unique_guild();
    let member = Snowflake::new(10);

    engine.play(first_guild, member, "first guild song").await.unwrap();
    engine.play(second_guild, member, "second guild song").await.unwrap();

    engine.stop_session(first_guild, member).unwrap();

    assert!(matches!(
        engine.queue_view(first_guild),
        Err(EngineError::SessionNotFound { .. })
    ));
    assert_eq!(
        engine.queue_view(second_guild).unwrap().current.title,
        "second guild song"
    );
}
