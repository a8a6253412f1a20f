//! Member activity database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the member_activity table.
///
/// Column names `season_points` and `lifetime_points` are read by
/// external reporting tools and stay as they are.
#[derive(Debug, Clone, FromRow)]
pub struct MemberActivityModel {
    pub guild_id: i64,
    pub member_id: i64,
    pub season_points: f64,
    pub lifetime_points: f64,
    pub voice_seconds: i64,
    pub last_event_at: DateTime<Utc>,
}
