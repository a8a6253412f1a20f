//! Repository traits (ports) - define the interface for durable state
//!
//! The engine works against these and never against a concrete store.
//! Production wires the Postgres implementations; tests and single-node
//! setups use the in-memory ones.

use async_trait::async_trait;

use crate::entities::{MemberActivity, Season, SeasonStatus};
use crate::error::EngineError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, EngineError>;

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Insert or update one ledger row (keyed by guild + member)
    async fn upsert(&self, activity: &MemberActivity) -> RepoResult<()>;

    /// All ledger rows of one guild
    async fn fetch_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<MemberActivity>>;

    /// Every ledger row across guilds, for startup hydration
    async fn fetch_all(&self) -> RepoResult<Vec<MemberActivity>>;

    /// Zero the season counter of every row in a guild. Idempotent, so
    /// a crashed rollover can safely run it again.
    async fn reset_season_points(&self, guild_id: Snowflake) -> RepoResult<()>;
}

#[async_trait]
pub trait SeasonRepository: Send + Sync {
    /// Persist a freshly opened season
    async fn insert(&self, season: &Season) -> RepoResult<()>;

    /// Record a season status transition
    async fn update_status(&self, id: Snowflake, status: SeasonStatus) -> RepoResult<()>;

    /// All non-archived seasons across guilds, for startup hydration.
    /// Finalizing rows signal an interrupted rollover to resume.
    async fn find_open(&self) -> RepoResult<Vec<Season>>;

    /// Season history of one guild, newest first
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Season>>;
}
