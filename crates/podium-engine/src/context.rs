//! Engine context - dependency container for engine services
//!
//! Holds the guild registry, repositories, resolver, scoring policy, and
//! the bus/persist handles every service needs.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use chrono::Utc;
use podium_common::config::EngineSettings;
use podium_core::traits::{ActivityRepository, SeasonRepository, TrackResolver};
use podium_core::{
    EngineError, HeuristicQualityScorer, QualityScorer, ScoringPolicy, Season, Snowflake,
    SnowflakeGenerator,
};

use crate::events::EventBus;
use crate::persist::{self, PersistCommand, PersistHandle};
use crate::registry::{GuildRegistry, GuildShard};

/// Engine context containing all dependencies
///
/// This is the dependency container handed to every service. It provides
/// access to:
/// - The guild shard registry
/// - Durable repositories (activity ledger, seasons)
/// - The track resolver and message quality scorer
/// - Scoring policy and engine settings
/// - Snowflake generator for ID generation
/// - Event bus and write-behind persist queue
#[derive(Clone)]
pub struct EngineContext {
    registry: Arc<GuildRegistry>,

    // Repositories
    activity_repo: Arc<dyn ActivityRepository>,
    season_repo: Arc<dyn SeasonRepository>,

    // Pluggable policies
    resolver: Arc<dyn TrackResolver>,
    quality: Arc<dyn QualityScorer>,
    policy: ScoringPolicy,
    settings: EngineSettings,

    // Infrastructure
    generator: Arc<SnowflakeGenerator>,
    bus: EventBus,
    persist: PersistHandle,
}

impl EngineContext {
    /// Create a new engine context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<GuildRegistry>,
        activity_repo: Arc<dyn ActivityRepository>,
        season_repo: Arc<dyn SeasonRepository>,
        resolver: Arc<dyn TrackResolver>,
        quality: Arc<dyn QualityScorer>,
        policy: ScoringPolicy,
        settings: EngineSettings,
        generator: Arc<SnowflakeGenerator>,
        bus: EventBus,
        persist: PersistHandle,
    ) -> Self {
        Self {
            registry,
            activity_repo,
            season_repo,
            resolver,
            quality,
            policy,
            settings,
            generator,
            bus,
            persist,
        }
    }

    /// Get the guild registry
    pub fn registry(&self) -> &GuildRegistry {
        self.registry.as_ref()
    }

    /// Get the activity repository
    pub fn activity_repo(&self) -> &dyn ActivityRepository {
        self.activity_repo.as_ref()
    }

    /// Get the season repository
    pub fn season_repo(&self) -> &dyn SeasonRepository {
        self.season_repo.as_ref()
    }

    /// Get the track resolver
    pub fn resolver(&self) -> &dyn TrackResolver {
        self.resolver.as_ref()
    }

    /// Get the message quality scorer
    pub fn quality(&self) -> &dyn QualityScorer {
        self.quality.as_ref()
    }

    /// Get the scoring policy
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Get the engine settings
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Get the event bus
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Get the persist queue handle
    pub fn persist(&self) -> &PersistHandle {
        &self.persist
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.generator.generate()
    }

    pub(crate) fn activity_repo_arc(&self) -> Arc<dyn ActivityRepository> {
        Arc::clone(&self.activity_repo)
    }

    pub(crate) fn season_repo_arc(&self) -> Arc<dyn SeasonRepository> {
        Arc::clone(&self.season_repo)
    }

    /// Open a fresh Active season for a guild, starting now
    pub(crate) fn mint_season(&self, guild_id: Snowflake) -> Season {
        Season::open(
            self.generate_id(),
            guild_id,
            Utc::now(),
            self.settings.season_length(),
        )
    }

    /// Resolve a guild's shard, minting and persisting a season when the
    /// guild is seen for the first time
    pub(crate) fn shard(&self, guild_id: Snowflake) -> Arc<GuildShard> {
        let (shard, created) = self
            .registry
            .get_or_insert(guild_id, || self.mint_season(guild_id));
        if created {
            let season = shard.season.read().clone();
            info!(guild_id = %guild_id, season_id = %season.id, "First activity for guild, season opened");
            self.persist.enqueue(PersistCommand::InsertSeason(season));
        }
        shard
    }
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("guilds", &self.registry.len())
            .field("policy", &self.policy)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating an EngineContext with custom configuration
pub struct EngineContextBuilder {
    activity_repo: Option<Arc<dyn ActivityRepository>>,
    season_repo: Option<Arc<dyn SeasonRepository>>,
    resolver: Option<Arc<dyn TrackResolver>>,
    quality: Option<Arc<dyn QualityScorer>>,
    policy: Option<ScoringPolicy>,
    settings: Option<EngineSettings>,
    generator: Option<Arc<SnowflakeGenerator>>,
}

impl EngineContextBuilder {
    pub fn new() -> Self {
        Self {
            activity_repo: None,
            season_repo: None,
            resolver: None,
            quality: None,
            policy: None,
            settings: None,
            generator: None,
        }
    }

    pub fn activity_repo(mut self, repo: Arc<dyn ActivityRepository>) -> Self {
        self.activity_repo = Some(repo);
        self
    }

    pub fn season_repo(mut self, repo: Arc<dyn SeasonRepository>) -> Self {
        self.season_repo = Some(repo);
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn TrackResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn quality(mut self, quality: Arc<dyn QualityScorer>) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Build the context plus the receiving half of the persist queue.
    /// The receiver goes to [`crate::Engine::new`], which wires it into
    /// the persist worker.
    ///
    /// # Errors
    /// Returns `EngineError::InternalError` if a required dependency is
    /// missing. Policy, settings, quality scorer, and generator fall
    /// back to defaults.
    pub fn build(self) -> Result<(EngineContext, mpsc::Receiver<PersistCommand>), EngineError> {
        let activity_repo = self
            .activity_repo
            .ok_or_else(|| EngineError::InternalError("activity_repo is required".to_string()))?;
        let season_repo = self
            .season_repo
            .ok_or_else(|| EngineError::InternalError("season_repo is required".to_string()))?;
        let resolver = self
            .resolver
            .ok_or_else(|| EngineError::InternalError("resolver is required".to_string()))?;

        let policy = self.policy.unwrap_or_default();
        let settings = self.settings.unwrap_or_default();
        let quality = self
            .quality
            .unwrap_or_else(|| Arc::new(HeuristicQualityScorer));
        let generator = self
            .generator
            .unwrap_or_else(|| Arc::new(SnowflakeGenerator::new(settings.worker_id)));

        let bus = EventBus::new(settings.event_bus_capacity);
        let (persist, persist_rx) = persist::channel(settings.persist_queue_capacity);

        let ctx = EngineContext::new(
            Arc::new(GuildRegistry::new()),
            activity_repo,
            season_repo,
            resolver,
            quality,
            policy,
            settings,
            generator,
            bus,
            persist,
        );
        Ok((ctx, persist_rx))
    }
}

impl Default for EngineContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
