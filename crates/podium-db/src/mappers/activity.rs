//! MemberActivity entity <-> model mapper

use podium_core::entities::MemberActivity;
use podium_core::value_objects::{Points, Snowflake};

use crate::models::MemberActivityModel;

/// Convert MemberActivityModel to MemberActivity entity
impl From<MemberActivityModel> for MemberActivity {
    fn from(model: MemberActivityModel) -> Self {
        MemberActivity {
            guild_id: Snowflake::new(model.guild_id),
            member_id: Snowflake::new(model.member_id),
            season_points: Points::new(model.season_points),
            lifetime_points: Points::new(model.lifetime_points),
            voice_seconds: model.voice_seconds,
            last_event_at: model.last_event_at,
        }
    }
}

/// Convert MemberActivity entity reference to values for database upsert
pub struct ActivityUpsert {
    pub guild_id: i64,
    pub member_id: i64,
    pub season_points: f64,
    pub lifetime_points: f64,
    pub voice_seconds: i64,
    pub last_event_at: chrono::DateTime<chrono::Utc>,
}

impl ActivityUpsert {
    pub fn new(activity: &MemberActivity) -> Self {
        Self {
            guild_id: activity.guild_id.into_inner(),
            member_id: activity.member_id.into_inner(),
            season_points: activity.season_points.value(),
            lifetime_points: activity.lifetime_points.value(),
            voice_seconds: activity.voice_seconds,
            last_event_at: activity.last_event_at,
        }
    }
}
