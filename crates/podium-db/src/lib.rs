//! # podium-db
//!
//! Database layer implementing the engine's repository ports with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository
//! traits defined in `podium-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! Two tables back the whole engine: `member_activity` (one row per
//! guild + member, columns `season_points`, `lifetime_points`,
//! `voice_seconds`) and `seasons` (one row per competition window,
//! `status` holding the lifecycle string). Both are the durable contract
//! external tooling reads, so column names stay stable.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use podium_db::pool::create_pool_from_env;
//! use podium_db::repositories::PgActivityRepository;
//! use podium_core::traits::ActivityRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool_from_env().await?;
//!     let activity_repo = PgActivityRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool, PoolError};
pub use repositories::{PgActivityRepository, PgSeasonRepository};
