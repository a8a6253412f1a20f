//! Test fixtures and data generators
//!
//! Provides reusable ids and activity events for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{TimeZone, Utc};
use podium_core::{ActivityEvent, ActivityKind, MessageFeatures, Snowflake, VoicePerk};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A guild id no other test in the process is using
pub fn unique_guild() -> Snowflake {
    Snowflake::new(1_000_000 + unique_suffix() as i64)
}

/// A plain short message with no quality signals
pub fn message(guild_id: Snowflake, member_id: Snowflake) -> ActivityEvent {
    ActivityEvent::now(
        guild_id,
        member_id,
        ActivityKind::Message {
            features: MessageFeatures::default(),
        },
    )
}

/// A message maxing out every quality signal
pub fn rich_message(guild_id: Snowflake, member_id: Snowflake) -> ActivityEvent {
    ActivityEvent::now(
        guild_id,
        member_id,
        ActivityKind::Message {
            features: MessageFeatures {
                char_len: 400,
                attachment_count: 1,
                link_count: 1,
            },
        },
    )
}

/// A voice presence tick with company in the channel
pub fn group_voice_tick(
    guild_id: Snowflake,
    member_id: Snowflake,
    minutes: f64,
) -> ActivityEvent {
    ActivityEvent::now(
        guild_id,
        member_id,
        ActivityKind::VoiceTick {
            minutes,
            humans_present: 3,
        },
    )
}

/// A voice presence tick for a member alone in the channel
pub fn solo_voice_tick(guild_id: Snowflake, member_id: Snowflake, minutes: f64) -> ActivityEvent {
    ActivityEvent::now(
        guild_id,
        member_id,
        ActivityKind::VoiceTick {
            minutes,
            humans_present: 1,
        },
    )
}

/// A voice channel join boundary
pub fn voice_joined(guild_id: Snowflake, member_id: Snowflake) -> ActivityEvent {
    ActivityEvent::now(
        guild_id,
        member_id,
        ActivityKind::VoiceJoined {
            channel_id: Snowflake::new(555),
        },
    )
}

/// A voice channel leave boundary
pub fn voice_left(guild_id: Snowflake, member_id: Snowflake) -> ActivityEvent {
    ActivityEvent::now(guild_id, member_id, ActivityKind::VoiceLeft)
}

/// A voice perk activation
pub fn perk(guild_id: Snowflake, member_id: Snowflake, perk: VoicePerk) -> ActivityEvent {
    ActivityEvent::now(guild_id, member_id, ActivityKind::VoicePerk { perk })
}

/// A reaction crediting both the reactor and the target author
pub fn reaction(guild_id: Snowflake, member_id: Snowflake, target: Snowflake) -> ActivityEvent {
    ActivityEvent::now(guild_id, member_id, ActivityKind::Reaction { target })
}

/// Re-stamp an event onto a fixed date at the given UTC hour
pub fn at_hour(mut event: ActivityEvent, hour: u32) -> ActivityEvent {
    event.timestamp = Utc.with_ymd_and_hms(2026, 3, 10, hour, 30, 0).unwrap();
    event
}
