//! Engine errors - every failure an engine operation can return
//!
//! None of these abort the process; callers surface rejections to the
//! member who issued the command and retry recoverable ones.

use thiserror::Error;

use crate::entities::season::IllegalTransition;
use crate::value_objects::Snowflake;

/// Engine operation errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Season-horizon mutation attempted while the guild season is
    /// finalizing or archived
    #[error("Season is closed for guild {guild_id}")]
    SeasonClosed { guild_id: Snowflake },

    /// Actor's season rank does not dominate the session holder's
    #[error("Actor {actor} is outranked by session holder {holder}")]
    PermissionDenied { actor: Snowflake, holder: Snowflake },

    /// Queue operation addressed a position past the end
    #[error("Position {position} out of range (queue length {queue_len})")]
    PositionOutOfRange { position: usize, queue_len: usize },

    /// Playback command for a guild with no live music session
    #[error("No active music session in guild {guild_id}")]
    SessionNotFound { guild_id: Snowflake },

    /// Rollover could not move a finalizing season forward
    #[error("Season {season_id} stuck finalizing in guild {guild_id}")]
    RolloverStuck { guild_id: Snowflake, season_id: Snowflake },

    #[error("Guild not found: {0}")]
    UnknownGuild(Snowflake),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl EngineError {
    /// Get an error code string for the notification layer
    pub fn code(&self) -> &'static str {
        match self {
            Self::SeasonClosed { .. } => "SEASON_CLOSED",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::PositionOutOfRange { .. } => "POSITION_OUT_OF_RANGE",
            Self::SessionNotFound { .. } => "SESSION_NOT_FOUND",
            Self::RolloverStuck { .. } => "ROLLOVER_STUCK",
            Self::UnknownGuild(_) => "UNKNOWN_GUILD",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Rule rejections: the command was understood and refused. Surfaced
    /// to the issuing member, never retried.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::SeasonClosed { .. }
                | Self::PermissionDenied { .. }
                | Self::PositionOutOfRange { .. }
                | Self::SessionNotFound { .. }
                | Self::UnknownGuild(_)
        )
    }

    /// Transient failures worth retrying after a delay
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::StorageError(_) | Self::RolloverStuck { .. })
    }
}

impl From<IllegalTransition> for EngineError {
    fn from(err: IllegalTransition) -> Self {
        Self::InternalError(err.to_string())
    }
}
