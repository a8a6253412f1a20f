//! Track entity and playback vocabulary for guild music sessions

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::value_objects::Snowflake;

/// Engine-local track identity (tracks are never persisted, so a uuid
/// is enough; no need for platform-shaped ids here)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the media lives, as handed back by the resolver. The engine
/// treats this as opaque; only the playback layer dereferences it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind", content = "value")]
pub enum SourceRef {
    /// Direct media URL
    Url(String),
    /// Search expression the playback layer resolves at fetch time
    Search(String),
}

/// A resolved, playable queue entry. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub duration_secs: u32,
    pub requester_id: Snowflake,
    pub source: SourceRef,
}

impl Track {
    /// Build a track from resolved metadata, minting a fresh id
    pub fn new(title: impl Into<String>, duration_secs: u32, requester_id: Snowflake, source: SourceRef) -> Self {
        Self {
            id: TrackId::new(),
            title: title.into(),
            duration_secs,
            requester_id,
            source,
        }
    }
}

/// What happens when the current track finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepeatMode {
    /// Advance through the queue, ending the session when drained
    #[default]
    Off,
    /// Replay the current track until the mode changes
    Track,
    /// Re-enqueue the finished track at the back
    Queue,
}
