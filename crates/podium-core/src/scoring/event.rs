//! Activity events - the gateway-facing input vocabulary of the engine

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Horizon, Snowflake};

/// One observed act of member activity, timestamped at ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub guild_id: Snowflake,
    pub member_id: Snowflake,
    #[serde(flatten)]
    pub kind: ActivityKind,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    /// Build an event stamped with the current time
    pub fn now(guild_id: Snowflake, member_id: Snowflake, kind: ActivityKind) -> Self {
        Self {
            guild_id,
            member_id,
            kind,
            timestamp: Utc::now(),
        }
    }
}

/// What the member did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    /// Periodic presence tick for a member sitting in a voice channel
    VoiceTick { minutes: f64, humans_present: u32 },
    /// Member entered a voice channel (session boundary, no points)
    VoiceJoined { channel_id: Snowflake },
    /// Member left their voice channel (session boundary, no points)
    VoiceLeft,
    /// Member switched on a voice perk; credited once per voice session
    VoicePerk { perk: VoicePerk },
    /// Member posted a message
    Message { features: MessageFeatures },
    /// Member added a reaction; the target author is credited too
    Reaction { target: Snowflake },
    /// Admin corrective edit applied directly to one horizon
    Adjust { delta: f64, horizon: Horizon },
}

/// Extra engagement signals a member can enable inside a voice session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoicePerk {
    Camera,
    ScreenShare,
    LiveStream,
}

bitflags! {
    /// Per-session record of perks already credited, so toggling a camera
    /// off and on cannot farm the bonus twice
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VoicePerks: u8 {
        const CAMERA = 1 << 0;
        const SCREEN_SHARE = 1 << 1;
        const LIVE_STREAM = 1 << 2;
    }
}

impl From<VoicePerk> for VoicePerks {
    fn from(perk: VoicePerk) -> Self {
        match perk {
            VoicePerk::Camera => VoicePerks::CAMERA,
            VoicePerk::ScreenShare => VoicePerks::SCREEN_SHARE,
            VoicePerk::LiveStream => VoicePerks::LIVE_STREAM,
        }
    }
}

/// Shape signals of a posted message, extracted by the gateway layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageFeatures {
    pub char_len: u32,
    pub attachment_count: u32,
    pub link_count: u32,
}
