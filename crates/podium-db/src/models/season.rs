//! Season database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the seasons table. `status` holds the lifecycle
/// string (ACTIVE / FINALIZING / ARCHIVED); a FINALIZING row found at
/// startup marks an interrupted rollover.
#[derive(Debug, Clone, FromRow)]
pub struct SeasonModel {
    pub id: i64,
    pub guild_id: i64,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: String,
}
