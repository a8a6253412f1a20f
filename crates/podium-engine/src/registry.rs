//! Guild state registry - the engine's in-memory working set
//!
//! One shard per guild. All scoring, ranking, voice, and playback state
//! for a guild lives behind its shard's locks, so operations on distinct
//! guilds never contend and operations on one guild serialize exactly
//! where its locks say they do.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};

use podium_core::{MemberActivity, Season, Snowflake, VoicePerks};

use crate::services::rank::RankCache;
use crate::services::session::MusicSession;

/// Live voice presence of one member, tracked between join and leave
#[derive(Debug, Clone)]
pub struct VoiceSession {
    pub channel_id: Snowflake,
    pub joined_at: DateTime<Utc>,
    /// Perks already credited this session
    pub credited: VoicePerks,
}

impl VoiceSession {
    pub fn new(channel_id: Snowflake) -> Self {
        Self {
            channel_id,
            joined_at: Utc::now(),
            credited: VoicePerks::default(),
        }
    }
}

/// Per-guild state shard.
///
/// Lock order inside a shard: `members` before `season`. Scoring holds
/// both to read season state while writing the ledger; rollover holds
/// both for writing, which is what fences scoring out of a half-reset
/// guild. `music` is independent and stays held across a whole control
/// command, so commands within a guild serialize on it. None of these
/// locks is ever held across an await point.
pub struct GuildShard {
    pub(crate) members: RwLock<HashMap<Snowflake, MemberActivity>>,
    pub(crate) season: RwLock<Season>,
    pub(crate) season_ranks: RankCache,
    pub(crate) lifetime_ranks: RankCache,
    pub(crate) voice: RwLock<HashMap<Snowflake, VoiceSession>>,
    pub(crate) music: Mutex<Option<MusicSession>>,
}

impl GuildShard {
    pub(crate) fn new(season: Season) -> Self {
        Self {
            members: RwLock::new(HashMap::new()),
            season: RwLock::new(season),
            season_ranks: RankCache::new(),
            lifetime_ranks: RankCache::new(),
            voice: RwLock::new(HashMap::new()),
            music: Mutex::new(None),
        }
    }

    /// Mark both rank caches stale after a ledger write
    pub(crate) fn invalidate_ranks(&self) {
        self.season_ranks.invalidate();
        self.lifetime_ranks.invalidate();
    }
}

/// Concurrent map of guild shards. `DashMap` locks per bucket, so shard
/// lookup never serializes guilds against each other.
pub struct GuildRegistry {
    shards: DashMap<Snowflake, Arc<GuildShard>>,
}

impl GuildRegistry {
    pub fn new() -> Self {
        Self {
            shards: DashMap::new(),
        }
    }

    /// Look up a guild's shard
    pub fn get(&self, guild_id: Snowflake) -> Option<Arc<GuildShard>> {
        self.shards.get(&guild_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Fetch a shard, creating one with a freshly minted season on first
    /// sight of the guild. Returns whether this call created it, so the
    /// caller can persist the minted season exactly once.
    pub fn get_or_insert(
        &self,
        guild_id: Snowflake,
        mint_season: impl FnOnce() -> Season,
    ) -> (Arc<GuildShard>, bool) {
        let mut created = false;
        let shard = Arc::clone(
            self.shards
                .entry(guild_id)
                .or_insert_with(|| {
                    created = true;
                    Arc::new(GuildShard::new(mint_season()))
                })
                .value(),
        );
        (shard, created)
    }

    /// Install a shard built during hydration
    pub fn insert(&self, guild_id: Snowflake, shard: Arc<GuildShard>) {
        self.shards.insert(guild_id, shard);
    }

    /// Ids of every guild currently resident
    pub fn guild_ids(&self) -> Vec<Snowflake> {
        self.shards.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}

impl Default for GuildRegistry {
    fn default() -> Self {
        Self::new()
    }
}
