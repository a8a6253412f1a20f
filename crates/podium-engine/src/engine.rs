//! Engine façade - hydration, background tasks, and the typed
//! operation surface callers talk to
//!
//! One [`Engine`] owns the whole runtime: hydrate once, start the
//! persist worker and season sweeper, then call operations. Every
//! operation delegates to the service owning that slice of the domain.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, instrument, warn};

use podium_core::traits::TrackDescriptor;
use podium_core::{
    ActivityEvent, EngineError, EngineEvent, Horizon, MemberActivity, Points, RepeatMode, Season,
    SeasonStatus, Snowflake, Track,
};

use crate::context::EngineContext;
use crate::persist::{PersistCommand, Persister};
use crate::registry::GuildShard;
use crate::services::gate::PermissionGate;
use crate::services::jukebox::{Jukebox, PlayOutcome};
use crate::services::ledger::{ActivityLedger, RecordOutcome};
use crate::services::rank::{RankEntry, RankService};
use crate::services::season::SeasonCycle;
use crate::services::session::{Advance, QueueView};

/// The assembled engine
pub struct Engine {
    ctx: EngineContext,
    cycle: Arc<SeasonCycle>,
    /// Persist worker, consumed by the first `start`
    persister: Mutex<Option<Persister>>,
}

impl Engine {
    /// Assemble an engine from a built context and its persist queue
    pub fn new(ctx: EngineContext, persist_rx: mpsc::Receiver<PersistCommand>) -> Self {
        let persister = Persister::new(
            ctx.activity_repo_arc(),
            ctx.season_repo_arc(),
            persist_rx,
        );
        let cycle = Arc::new(SeasonCycle::new(ctx.clone()));
        Self {
            ctx,
            cycle,
            persister: Mutex::new(Some(persister)),
        }
    }

    /// Rebuild in-memory state from the repositories. Call once before
    /// `start`, on an empty registry.
    ///
    /// Finalizing seasons are interrupted rollovers; their remaining
    /// steps are idempotent and get replayed here before any row is
    /// loaded. Guilds with rows but no open season get a fresh one.
    /// Returns the number of resident guilds.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> Result<usize, EngineError> {
        let mut active: HashMap<Snowflake, Season> = HashMap::new();
        let mut stalled: Vec<Season> = Vec::new();
        for season in self.ctx.season_repo().find_open().await? {
            match season.status {
                SeasonStatus::Active => match active.entry(season.guild_id) {
                    Entry::Occupied(mut slot) => {
                        // Newest season wins the shard
                        if season.started_at > slot.get().started_at {
                            slot.insert(season);
                        }
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(season);
                    }
                },
                SeasonStatus::Finalizing => stalled.push(season),
                SeasonStatus::Archived => {}
            }
        }

        let mut recovered: Vec<Snowflake> = Vec::new();
        for season in &stalled {
            warn!(
                guild_id = %season.guild_id,
                season_id = %season.id,
                "Resuming interrupted rollover"
            );
            self.ctx
                .activity_repo()
                .reset_season_points(season.guild_id)
                .await?;
            self.ctx
                .season_repo()
                .update_status(season.id, SeasonStatus::Archived)
                .await?;
            recovered.push(season.guild_id);
        }

        let mut by_guild: HashMap<Snowflake, HashMap<Snowflake, MemberActivity>> = HashMap::new();
        for row in self.ctx.activity_repo().fetch_all().await? {
            by_guild
                .entry(row.guild_id)
                .or_default()
                .insert(row.member_id, row);
        }

        let mut guild_ids: HashSet<Snowflake> = active.keys().copied().collect();
        guild_ids.extend(by_guild.keys().copied());
        guild_ids.extend(recovered.iter().copied());

        for guild_id in guild_ids {
            let season = match active.remove(&guild_id) {
                Some(season) => season,
                None => {
                    let season = self.ctx.mint_season(guild_id);
                    self.ctx.season_repo().insert(&season).await?;
                    season
                }
            };
            let shard = GuildShard::new(season);
            if let Some(rows) = by_guild.remove(&guild_id) {
                *shard.members.write() = rows;
            }
            self.ctx.registry().insert(guild_id, Arc::new(shard));
        }

        let guilds = self.ctx.registry().len();
        info!(guilds, "Engine hydrated");
        Ok(guilds)
    }

    /// Start the persist worker and the season sweeper
    pub fn start(&self) {
        let Some(persister) = self.persister.lock().take() else {
            warn!("Engine is already running");
            return;
        };
        persister.spawn();
        Arc::clone(&self.cycle).start();
        info!("Engine started");
    }

    /// Signal the season sweeper to exit. The persist worker drains
    /// until the engine is dropped.
    pub fn stop(&self) {
        self.cycle.stop();
    }

    /// Check if the season sweeper is running
    pub fn is_running(&self) -> bool {
        self.cycle.is_running()
    }

    /// Subscribe to domain events
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.ctx.bus().subscribe()
    }

    /// The shared context, for wiring and inspection
    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Run one season sweep now instead of waiting for the interval.
    /// Returns how many seasons rolled.
    pub fn sweep(&self) -> usize {
        self.cycle.sweep()
    }

    // ==================== Ledger ====================

    /// Record one activity event
    pub fn record(&self, event: ActivityEvent) -> Result<RecordOutcome, EngineError> {
        ActivityLedger::new(&self.ctx).record(event)
    }

    /// Apply an admin point correction to one horizon
    pub fn adjust(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        delta: f64,
        horizon: Horizon,
    ) -> Result<Points, EngineError> {
        ActivityLedger::new(&self.ctx).adjust(guild_id, member_id, delta, horizon)
    }

    /// A member's score under one horizon
    pub fn points_of(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        horizon: Horizon,
    ) -> Result<Points, EngineError> {
        ActivityLedger::new(&self.ctx).points_of(guild_id, member_id, horizon)
    }

    /// A member's tracked voice presence time
    pub fn voice_seconds_of(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
    ) -> Result<i64, EngineError> {
        ActivityLedger::new(&self.ctx).voice_seconds_of(guild_id, member_id)
    }

    // ==================== Rankings ====================

    /// A member's 1-based rank and the ranked total
    pub fn rank_of(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        horizon: Horizon,
    ) -> Result<Option<(usize, usize)>, EngineError> {
        RankService::new(&self.ctx).rank_of(guild_id, member_id, horizon)
    }

    /// The guild's top `n` for one horizon
    pub fn top_n(
        &self,
        guild_id: Snowflake,
        horizon: Horizon,
        n: usize,
    ) -> Result<Vec<RankEntry>, EngineError> {
        RankService::new(&self.ctx).top_n(guild_id, horizon, n)
    }

    /// Whether `actor` outranks `target` on the season board
    pub fn can_control(
        &self,
        guild_id: Snowflake,
        actor: Snowflake,
        target: Snowflake,
    ) -> Result<bool, EngineError> {
        PermissionGate::new(&self.ctx).can_control(guild_id, actor, target)
    }

    // ==================== Music ====================

    /// Resolve a play query and add the result to the guild's queue
    pub async fn play(
        &self,
        guild_id: Snowflake,
        actor: Snowflake,
        query: &str,
    ) -> Result<PlayOutcome, EngineError> {
        Jukebox::new(&self.ctx).play(guild_id, actor, query).await
    }

    /// Add an already resolved track to the guild's queue
    pub fn enqueue(
        &self,
        guild_id: Snowflake,
        actor: Snowflake,
        descriptor: TrackDescriptor,
    ) -> Result<PlayOutcome, EngineError> {
        Jukebox::new(&self.ctx).enqueue(guild_id, actor, descriptor)
    }

    /// Skip the current track. Gated.
    pub fn skip(&self, guild_id: Snowflake, actor: Snowflake) -> Result<Advance, EngineError> {
        Jukebox::new(&self.ctx).skip(guild_id, actor)
    }

    /// Stop playback and drop the guild's session. Gated.
    pub fn stop_session(&self, guild_id: Snowflake, actor: Snowflake) -> Result<(), EngineError> {
        Jukebox::new(&self.ctx).stop(guild_id, actor)
    }

    /// Remove the queued track at a 1-based position. Gated.
    pub fn remove_at(
        &self,
        guild_id: Snowflake,
        actor: Snowflake,
        position: usize,
    ) -> Result<Track, EngineError> {
        Jukebox::new(&self.ctx).remove_at(guild_id, actor, position)
    }

    /// Change the repeat mode. Gated.
    pub fn set_repeat(
        &self,
        guild_id: Snowflake,
        actor: Snowflake,
        mode: RepeatMode,
    ) -> Result<(), EngineError> {
        Jukebox::new(&self.ctx).set_repeat(guild_id, actor, mode)
    }

    /// Snapshot the guild's queue
    pub fn queue_view(&self, guild_id: Snowflake) -> Result<QueueView, EngineError> {
        Jukebox::new(&self.ctx).queue_view(guild_id)
    }

    /// Playback layer callback for a track that finished on its own
    pub fn track_finished(&self, guild_id: Snowflake) -> Option<Advance> {
        Jukebox::new(&self.ctx).track_finished(guild_id)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("ctx", &self.ctx)
            .field("running", &self.is_running())
            .finish()
    }
}
