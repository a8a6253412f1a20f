//! Rank index - lazily rebuilt leaderboard snapshots
//!
//! Ledger writes mark a guild's caches dirty in O(1); the next reader
//! rebuilds the snapshot once and every later reader shares it through
//! an `Arc` until the next write.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use podium_core::{EngineError, Horizon, MemberActivity, Points, Snowflake};

use crate::context::EngineContext;
use crate::registry::GuildShard;

/// One member's place on a leaderboard
#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    /// 1-based rank
    pub rank: usize,
    pub member_id: Snowflake,
    pub points: Points,
}

/// Immutable leaderboard built from the ledger at one instant
#[derive(Debug, Default)]
pub struct RankSnapshot {
    entries: Vec<RankEntry>,
    positions: HashMap<Snowflake, usize>,
}

impl RankSnapshot {
    /// Build from ledger rows. Only members with positive points rank;
    /// order is points descending, member id ascending on ties, so two
    /// builds over the same rows always agree.
    pub fn build<'a, I>(rows: I, horizon: Horizon) -> Self
    where
        I: IntoIterator<Item = &'a MemberActivity>,
    {
        let mut scored: Vec<(Snowflake, Points)> = rows
            .into_iter()
            .filter(|row| row.is_ranked(horizon))
            .map(|row| (row.member_id, row.points(horizon)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut entries = Vec::with_capacity(scored.len());
        let mut positions = HashMap::with_capacity(scored.len());
        for (index, (member_id, points)) in scored.into_iter().enumerate() {
            positions.insert(member_id, index);
            entries.push(RankEntry {
                rank: index + 1,
                member_id,
                points,
            });
        }
        Self { entries, positions }
    }

    /// 1-based rank plus the ranked-member count, `None` when the member
    /// is not on the board
    pub fn rank_of(&self, member_id: Snowflake) -> Option<(usize, usize)> {
        self.positions
            .get(&member_id)
            .map(|index| (index + 1, self.entries.len()))
    }

    /// The top `n` entries in rank order
    pub fn top_n(&self, n: usize) -> Vec<RankEntry> {
        self.entries.iter().take(n).cloned().collect()
    }

    pub fn total_ranked(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[RankEntry] {
        &self.entries
    }
}

/// Dirty-flagged snapshot slot. Writers mark it stale in O(1); the next
/// reader rebuilds before answering.
pub(crate) struct RankCache {
    dirty: AtomicBool,
    snapshot: RwLock<Arc<RankSnapshot>>,
}

impl RankCache {
    pub(crate) fn new() -> Self {
        Self {
            dirty: AtomicBool::new(true),
            snapshot: RwLock::new(Arc::new(RankSnapshot::default())),
        }
    }

    pub(crate) fn invalidate(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Current snapshot, rebuilding first when stale. The dirty flag is
    /// cleared under the slot's write lock, so a mark arriving during a
    /// rebuild forces another rebuild instead of being lost.
    pub(crate) fn read(&self, rebuild: impl FnOnce() -> RankSnapshot) -> Arc<RankSnapshot> {
        if !self.dirty.load(Ordering::SeqCst) {
            return self.snapshot.read().clone();
        }
        let mut slot = self.snapshot.write();
        if self.dirty.swap(false, Ordering::SeqCst) {
            *slot = Arc::new(rebuild());
        }
        slot.clone()
    }
}

/// Resolve one horizon's snapshot on a shard, rebuilding from the member
/// ledger when the cache is stale
pub(crate) fn shard_snapshot(shard: &GuildShard, horizon: Horizon) -> Arc<RankSnapshot> {
    let cache = match horizon {
        Horizon::Season => &shard.season_ranks,
        Horizon::Lifetime => &shard.lifetime_ranks,
    };
    cache.read(|| {
        let members = shard.members.read();
        RankSnapshot::build(members.values(), horizon)
    })
}

/// Leaderboard queries
pub struct RankService<'a> {
    ctx: &'a EngineContext,
}

impl<'a> RankService<'a> {
    /// Create a new RankService
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Full snapshot for one guild and horizon
    pub fn snapshot(
        &self,
        guild_id: Snowflake,
        horizon: Horizon,
    ) -> Result<Arc<RankSnapshot>, EngineError> {
        let shard = self
            .ctx
            .registry()
            .get(guild_id)
            .ok_or(EngineError::UnknownGuild(guild_id))?;
        Ok(shard_snapshot(&shard, horizon))
    }

    /// A member's 1-based rank and the ranked total
    pub fn rank_of(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        horizon: Horizon,
    ) -> Result<Option<(usize, usize)>, EngineError> {
        Ok(self.snapshot(guild_id, horizon)?.rank_of(member_id))
    }

    /// The guild's top `n` for one horizon
    pub fn top_n(
        &self,
        guild_id: Snowflake,
        horizon: Horizon,
        n: usize,
    ) -> Result<Vec<RankEntry>, EngineError> {
        Ok(self.snapshot(guild_id, horizon)?.top_n(n))
    }
}
