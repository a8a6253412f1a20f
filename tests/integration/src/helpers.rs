//! Test helpers for integration tests
//!
//! Provides utilities for assembling engines over in-memory stores and
//! for waiting on write-behind persistence.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::Utc;
use podium_common::config::EngineSettings;
use podium_core::{
    ActivityRepository, MemberActivity, Points, Season, SeasonRepository, SeasonStatus, Snowflake,
};
use podium_engine::{
    EchoResolver, Engine, EngineContextBuilder, MemoryActivityRepository, MemorySeasonRepository,
};

/// How long persistence polls wait before giving up
const WAIT_TIMEOUT: Duration = Duration::from_secs(2);
const WAIT_STEP: Duration = Duration::from_millis(10);

/// Engine settings tuned for tests
pub fn test_settings() -> EngineSettings {
    EngineSettings {
        season_length_days: 14,
        rollover_sweep_secs: 1,
        utc_offset_hours: 0,
        event_bus_capacity: 64,
        persist_queue_capacity: 256,
        worker_id: 1,
    }
}

/// Engine instance wired to in-memory stores
pub struct TestEngine {
    pub engine: Engine,
    pub activity_repo: Arc<MemoryActivityRepository>,
    pub season_repo: Arc<MemorySeasonRepository>,
}

impl TestEngine {
    /// Assemble an engine over fresh stores and start its background
    /// workers
    pub fn start() -> Result<Self> {
        let harness = Self::idle()?;
        harness.engine.start();
        Ok(harness)
    }

    /// Assemble an engine over fresh stores without starting workers.
    /// Sweeps and persistence then only run when the test asks.
    pub fn idle() -> Result<Self> {
        podium_common::telemetry::try_init_tracing().ok();
        let activity_repo = Arc::new(MemoryActivityRepository::new());
        let season_repo = Arc::new(MemorySeasonRepository::new());
        let engine = assemble(&activity_repo, &season_repo, test_settings())?;
        Ok(Self {
            engine,
            activity_repo,
            season_repo,
        })
    }

    /// Build a second engine over the same stores and hydrate it, as if
    /// the process restarted
    pub async fn restart(&self) -> Result<Engine> {
        let engine = assemble(&self.activity_repo, &self.season_repo, test_settings())?;
        engine.hydrate().await?;
        Ok(engine)
    }

    /// Store an Active season that is already past its end
    pub async fn seed_due_season(&self, season_id: Snowflake, guild_id: Snowflake) -> Result<()> {
        let season = Season::open(
            season_id,
            guild_id,
            Utc::now() - chrono::Duration::days(15),
            chrono::Duration::days(14),
        );
        self.season_repo.insert(&season).await?;
        Ok(())
    }

    /// Poll the activity store until a member's row shows up
    pub async fn wait_for_row(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
    ) -> Result<MemberActivity> {
        let mut waited = Duration::ZERO;
        while waited < WAIT_TIMEOUT {
            let rows = self.activity_repo.fetch_guild(guild_id).await?;
            if let Some(row) = rows.into_iter().find(|row| row.member_id == member_id) {
                return Ok(row);
            }
            tokio::time::sleep(WAIT_STEP).await;
            waited += WAIT_STEP;
        }
        bail!("row for member {member_id} in guild {guild_id} never persisted");
    }

    /// Poll the activity store until a member's season counter reaches
    /// the expected value
    pub async fn wait_for_season_points(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        expected: Points,
    ) -> Result<MemberActivity> {
        let mut waited = Duration::ZERO;
        while waited < WAIT_TIMEOUT {
            let rows = self.activity_repo.fetch_guild(guild_id).await?;
            if let Some(row) = rows
                .into_iter()
                .find(|row| row.member_id == member_id && row.season_points == expected)
            {
                return Ok(row);
            }
            tokio::time::sleep(WAIT_STEP).await;
            waited += WAIT_STEP;
        }
        bail!("member {member_id} in guild {guild_id} never persisted at {expected} season points");
    }

    /// Poll the season store until a season reaches the expected status
    pub async fn wait_for_season_status(
        &self,
        guild_id: Snowflake,
        season_id: Snowflake,
        status: SeasonStatus,
    ) -> Result<()> {
        let mut waited = Duration::ZERO;
        while waited < WAIT_TIMEOUT {
            let seasons = self.season_repo.find_by_guild(guild_id).await?;
            if seasons
                .iter()
                .any(|season| season.id == season_id && season.status == status)
            {
                return Ok(());
            }
            tokio::time::sleep(WAIT_STEP).await;
            waited += WAIT_STEP;
        }
        bail!("season {season_id} never reached {status:?}");
    }
}

/// Wire an engine over the given stores
fn assemble(
    activity_repo: &Arc<MemoryActivityRepository>,
    season_repo: &Arc<MemorySeasonRepository>,
    settings: EngineSettings,
) -> Result<Engine> {
    let (ctx, persist_rx) = EngineContextBuilder::new()
        .activity_repo(Arc::clone(activity_repo) as Arc<dyn ActivityRepository>)
        .season_repo(Arc::clone(season_repo) as Arc<dyn SeasonRepository>)
        .resolver(Arc::new(EchoResolver))
        .settings(settings)
        .build()?;
    Ok(Engine::new(ctx, persist_rx))
}
