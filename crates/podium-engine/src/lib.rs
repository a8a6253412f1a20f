//! # podium-engine
//!
//! Engine layer: the in-memory activity ledger, lazily rebuilt rankings,
//! the season lifecycle, and rank-gated music sessions, all sharded per
//! guild. State lives in the guild registry; repositories only see the
//! write-behind persist queue and startup hydration.
//!
//! ```rust,ignore
//! let (ctx, persist_rx) = EngineContextBuilder::new()
//!     .activity_repo(activity_repo)
//!     .season_repo(season_repo)
//!     .resolver(resolver)
//!     .build()?;
//! let engine = Engine::new(ctx, persist_rx);
//! engine.hydrate().await?;
//! engine.start();
//! ```

pub mod context;
pub mod engine;
pub mod events;
pub mod memory;
pub mod persist;
pub mod registry;
pub mod services;

// Re-export commonly used types at crate root
pub use context::{EngineContext, EngineContextBuilder};
pub use engine::Engine;
pub use events::EventBus;
pub use memory::{EchoResolver, MemoryActivityRepository, MemorySeasonRepository};
pub use persist::{PersistCommand, PersistHandle, Persister};
pub use registry::{GuildRegistry, GuildShard};
pub use services::{
    ActivityLedger, Advance, Jukebox, MusicSession, PermissionGate, PlayOutcome, PlayState,
    QueueView, RankEntry, RankService, RankSnapshot, RecordOutcome, SeasonCycle,
};
