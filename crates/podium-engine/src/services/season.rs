//! Season cycle - rollover of due seasons and the background sweeper
//!
//! Rollover runs under the shard's `members` and `season` write locks
//! for its whole fenced window, so no reader ever observes a half-reset
//! guild. Every durable step goes through the persist queue in order;
//! a crash between steps leaves the season Finalizing, which hydration
//! recovers by redoing the idempotent remainder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use podium_core::events::SeasonRolledOverEvent;
use podium_core::{EngineError, EngineEvent, SeasonStatus, Snowflake};

use crate::context::EngineContext;
use crate::persist::PersistCommand;
use crate::registry::GuildShard;

/// Background sweeper driving season rollover
pub struct SeasonCycle {
    ctx: EngineContext,
    /// Whether the sweeper is running
    running: Arc<AtomicBool>,
}

impl SeasonCycle {
    pub fn new(ctx: EngineContext) -> Self {
        Self {
            ctx,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the sweep loop on a background task
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Season sweeper is already running");
            return;
        }
        tokio::spawn(self.run());
    }

    /// Signal the sweep loop to exit after its current tick
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the sweeper is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(self: Arc<Self>) {
        let period = self.ctx.settings().sweep_interval();
        let mut interval = tokio::time::interval(period);
        info!(period_secs = period.as_secs(), "Season sweeper started");

        while self.running.load(Ordering::SeqCst) {
            interval.tick().await;
            if !self.running.load(Ordering::SeqCst) {
                break;
            }
            let rolled = self.sweep();
            if rolled > 0 {
                info!(rolled, "Season sweep rolled over seasons");
            }
        }
        info!("Season sweeper stopped");
    }

    /// Run one sweep across every resident guild, rolling over each due
    /// season. Returns how many rolled.
    pub fn sweep(&self) -> usize {
        let now = Utc::now();
        let mut rolled = 0;
        for guild_id in self.ctx.registry().guild_ids() {
            let Some(shard) = self.ctx.registry().get(guild_id) else {
                continue;
            };
            if !shard.season.read().is_due(now) {
                continue;
            }
            match self.rollover(guild_id, &shard) {
                Ok(()) => rolled += 1,
                Err(e) => warn!(guild_id = %guild_id, error = %e, "Rollover failed"),
            }
        }
        rolled
    }

    /// Close a guild's due season and open the next one
    #[instrument(skip(self, shard))]
    fn rollover(&self, guild_id: Snowflake, shard: &GuildShard) -> Result<(), EngineError> {
        let mut members = shard.members.write();
        let mut season = shard.season.write();

        // The due check raced other sweeps until this lock; re-check
        if !season.is_due(Utc::now()) {
            return Ok(());
        }
        let closed_id = season.id;
        season.begin_finalizing().map_err(|_| EngineError::RolloverStuck {
            guild_id,
            season_id: closed_id,
        })?;
        self.ctx
            .persist()
            .enqueue(PersistCommand::UpdateSeasonStatus {
                season_id: closed_id,
                status: SeasonStatus::Finalizing,
            });

        for row in members.values_mut() {
            row.reset_season();
        }
        self.ctx
            .persist()
            .enqueue(PersistCommand::ResetSeasonPoints { guild_id });

        season.archive()?;
        self.ctx
            .persist()
            .enqueue(PersistCommand::UpdateSeasonStatus {
                season_id: closed_id,
                status: SeasonStatus::Archived,
            });

        let next = self.ctx.mint_season(guild_id);
        let next_id = next.id;
        self.ctx
            .persist()
            .enqueue(PersistCommand::InsertSeason(next.clone()));
        *season = next;

        drop(season);
        drop(members);

        shard.season_ranks.invalidate();
        info!(closed_season_id = %closed_id, new_season_id = %next_id, "Season rolled over");
        self.ctx
            .bus()
            .publish(EngineEvent::SeasonRolledOver(SeasonRolledOverEvent {
                guild_id,
                closed_season_id: closed_id,
                new_season_id: next_id,
                timestamp: Utc::now(),
            }));
        Ok(())
    }
}

impl Drop for SeasonCycle {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
