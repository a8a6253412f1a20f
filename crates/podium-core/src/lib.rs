//! # podium-core
//!
//! Domain layer for the activity-scoring and rank-gated session engine:
//! entities, value objects, pure scoring rules, domain events, and the port
//! traits the engine is wired through. This crate has zero dependencies on
//! infrastructure (database, async runtime, chat client).

pub mod entities;
pub mod error;
pub mod events;
pub mod scoring;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    MemberActivity, RepeatMode, Season, SeasonStatus, SourceRef, Track, TrackId,
};
pub use error::EngineError;
pub use events::{EngineEvent, SessionEndReason};
pub use scoring::{
    hour_multiplier, multiplier_at, ActivityEvent, ActivityKind, HeuristicQualityScorer,
    MessageFeatures, QualityScorer, ScoringPolicy, VoicePerk, VoicePerks,
};
pub use traits::{
    ActivityRepository, RepoResult, SeasonRepository, TrackDescriptor, TrackResolver,
};
pub use value_objects::{Horizon, Points, Snowflake, SnowflakeGenerator, SnowflakeParseError};
