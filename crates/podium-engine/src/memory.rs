//! In-memory adapters - repositories and a resolver backed by
//! process-local maps
//!
//! Tests and single-node runs drive the engine entirely on these;
//! production wires the Postgres repositories and a real resolver.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use podium_core::traits::{
    ActivityRepository, RepoResult, SeasonRepository, TrackDescriptor, TrackResolver,
};
use podium_core::{MemberActivity, Season, SeasonStatus, Snowflake, SourceRef};

/// Ledger rows keyed by guild and member
#[derive(Debug, Default)]
pub struct MemoryActivityRepository {
    rows: RwLock<HashMap<(Snowflake, Snowflake), MemberActivity>>,
}

impl MemoryActivityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivityRepository for MemoryActivityRepository {
    async fn upsert(&self, activity: &MemberActivity) -> RepoResult<()> {
        self.rows
            .write()
            .insert((activity.guild_id, activity.member_id), activity.clone());
        Ok(())
    }

    async fn fetch_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<MemberActivity>> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|row| row.guild_id == guild_id)
            .cloned()
            .collect())
    }

    async fn fetch_all(&self) -> RepoResult<Vec<MemberActivity>> {
        Ok(self.rows.read().values().cloned().collect())
    }

    async fn reset_season_points(&self, guild_id: Snowflake) -> RepoResult<()> {
        for row in self
            .rows
            .write()
            .values_mut()
            .filter(|row| row.guild_id == guild_id)
        {
            row.reset_season();
        }
        Ok(())
    }
}

/// Seasons keyed by id
#[derive(Debug, Default)]
pub struct MemorySeasonRepository {
    seasons: RwLock<HashMap<Snowflake, Season>>,
}

impl MemorySeasonRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeasonRepository for MemorySeasonRepository {
    async fn insert(&self, season: &Season) -> RepoResult<()> {
        // Same conflict behavior as the SQL DO NOTHING insert
        self.seasons
            .write()
            .entry(season.id)
            .or_insert_with(|| season.clone());
        Ok(())
    }

    async fn update_status(&self, id: Snowflake, status: SeasonStatus) -> RepoResult<()> {
        if let Some(season) = self.seasons.write().get_mut(&id) {
            season.status = status;
        }
        Ok(())
    }

    async fn find_open(&self) -> RepoResult<Vec<Season>> {
        let mut open: Vec<Season> = self
            .seasons
            .read()
            .values()
            .filter(|season| season.status != SeasonStatus::Archived)
            .cloned()
            .collect();
        open.sort_by_key(|season| (season.guild_id, season.started_at));
        Ok(open)
    }

    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Season>> {
        let mut history: Vec<Season> = self
            .seasons
            .read()
            .values()
            .filter(|season| season.guild_id == guild_id)
            .cloned()
            .collect();
        history.sort_by_key(|season| Reverse(season.started_at));
        Ok(history)
    }
}

/// Resolver that echoes the query back as playable metadata. Queries
/// that look like URLs keep the URL, everything else becomes a search
/// expression.
#[derive(Debug, Default)]
pub struct EchoResolver;

#[async_trait]
impl TrackResolver for EchoResolver {
    async fn resolve(&self, query: &str) -> RepoResult<TrackDescriptor> {
        let source = if query.starts_with("http://") || query.starts_with("https://") {
            SourceRef::Url(query.to_string())
        } else {
            SourceRef::Search(query.to_string())
        };
        Ok(TrackDescriptor {
            title: query.to_string(),
            duration_secs: 180,
            source,
        })
    }
}
