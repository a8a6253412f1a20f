//! Season entity <-> model mapper

use podium_core::entities::{Season, SeasonStatus};
use podium_core::error::EngineError;
use podium_core::value_objects::Snowflake;

use crate::models::SeasonModel;

/// Convert SeasonModel to Season entity.
/// Fails on a status string outside the lifecycle vocabulary, which
/// means the row was written by something other than this engine.
pub fn season_from_model(model: SeasonModel) -> Result<Season, EngineError> {
    let status = SeasonStatus::parse(&model.status).ok_or_else(|| {
        EngineError::StorageError(format!(
            "season {} has unknown status '{}'",
            model.id, model.status
        ))
    })?;

    Ok(Season {
        id: Snowflake::new(model.id),
        guild_id: Snowflake::new(model.guild_id),
        started_at: model.started_at,
        ends_at: model.ends_at,
        status,
    })
}

/// Convert Season entity reference to values for database insertion
pub struct SeasonInsert {
    pub id: i64,
    pub guild_id: i64,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: chrono::DateTime<chrono::Utc>,
    pub status: &'static str,
}

impl SeasonInsert {
    pub fn new(season: &Season) -> Self {
        Self {
            id: season.id.into_inner(),
            guild_id: season.guild_id.into_inner(),
            started_at: season.started_at,
            ends_at: season.ends_at,
            status: season.status.as_str(),
        }
    }
}
