//! Connection pool management

mod postgres;

pub use podium_common::config::DatabaseConfig;
pub use postgres::{create_pool, create_pool_from_env, PoolError};
pub use sqlx::PgPool;
