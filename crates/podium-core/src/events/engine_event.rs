//! Engine events - emitted when engine state changes
//!
//! These events are consumed by the notification layer to post rollover
//! announcements and now-playing embeds. The engine never formats user
//! facing text itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::TrackId;
use crate::value_objects::Snowflake;

/// All events the engine publishes on its broadcast bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineEvent {
    SeasonRolledOver(SeasonRolledOverEvent),
    TrackStarted(TrackStartedEvent),
    TrackEnqueued(TrackEnqueuedEvent),
    SessionEnded(SessionEndedEvent),
    PermissionDenied(PermissionDeniedEvent),
}

impl EngineEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SeasonRolledOver(_) => "SEASON_ROLLED_OVER",
            Self::TrackStarted(_) => "TRACK_STARTED",
            Self::TrackEnqueued(_) => "TRACK_ENQUEUED",
            Self::SessionEnded(_) => "SESSION_ENDED",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::SeasonRolledOver(e) => e.timestamp,
            Self::TrackStarted(e) => e.timestamp,
            Self::TrackEnqueued(e) => e.timestamp,
            Self::SessionEnded(e) => e.timestamp,
            Self::PermissionDenied(e) => e.timestamp,
        }
    }

    /// Guild the event belongs to
    pub fn guild_id(&self) -> Snowflake {
        match self {
            Self::SeasonRolledOver(e) => e.guild_id,
            Self::TrackStarted(e) => e.guild_id,
            Self::TrackEnqueued(e) => e.guild_id,
            Self::SessionEnded(e) => e.guild_id,
            Self::PermissionDenied(e) => e.guild_id,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonRolledOverEvent {
    pub guild_id: Snowflake,
    pub closed_season_id: Snowflake,
    pub new_season_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackStartedEvent {
    pub guild_id: Snowflake,
    pub track_id: TrackId,
    pub title: String,
    pub requester_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackEnqueuedEvent {
    pub guild_id: Snowflake,
    pub track_id: TrackId,
    pub title: String,
    pub requester_id: Snowflake,
    /// Zero-based position in the waiting queue
    pub position: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEndedEvent {
    pub guild_id: Snowflake,
    pub reason: SessionEndReason,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionDeniedEvent {
    pub guild_id: Snowflake,
    pub actor_id: Snowflake,
    pub holder_id: Snowflake,
    /// The command that was refused ("skip", "stop", "remove", ...)
    pub operation: String,
    pub timestamp: DateTime<Utc>,
}

/// Why a music session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEndReason {
    /// Explicit stop command
    Stopped,
    /// Queue ran out with repeat off
    Drained,
}
