//! PostgreSQL implementation of ActivityRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use podium_core::entities::MemberActivity;
use podium_core::traits::{ActivityRepository, RepoResult};
use podium_core::value_objects::Snowflake;

use crate::mappers::ActivityUpsert;
use crate::models::MemberActivityModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ActivityRepository
#[derive(Clone)]
pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    /// Create a new PgActivityRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    #[instrument(skip(self, activity), fields(guild_id = %activity.guild_id, member_id = %activity.member_id))]
    async fn upsert(&self, activity: &MemberActivity) -> RepoResult<()> {
        let row = ActivityUpsert::new(activity);

        sqlx::query(
            r#"
            INSERT INTO member_activity
                (guild_id, member_id, season_points, lifetime_points, voice_seconds, last_event_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (guild_id, member_id) DO UPDATE SET
                season_points = $3,
                lifetime_points = $4,
                voice_seconds = $5,
                last_event_at = $6
            "#,
        )
        .bind(row.guild_id)
        .bind(row.member_id)
        .bind(row.season_points)
        .bind(row.lifetime_points)
        .bind(row.voice_seconds)
        .bind(row.last_event_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<MemberActivity>> {
        let models = sqlx::query_as::<_, MemberActivityModel>(
            r#"
            SELECT guild_id, member_id, season_points, lifetime_points, voice_seconds, last_event_at
            FROM member_activity
            WHERE guild_id = $1
            "#,
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(MemberActivity::from).collect())
    }

    #[instrument(skip(self))]
    async fn fetch_all(&self) -> RepoResult<Vec<MemberActivity>> {
        let models = sqlx::query_as::<_, MemberActivityModel>(
            r#"
            SELECT guild_id, member_id, season_points, lifetime_points, voice_seconds, last_event_at
            FROM member_activity
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(MemberActivity::from).collect())
    }

    #[instrument(skip(self))]
    async fn reset_season_points(&self, guild_id: Snowflake) -> RepoResult<()> {
        // Single statement so a rerun after a crash is a no-op
        sqlx::query(
            r#"
            UPDATE member_activity SET season_points = 0 WHERE guild_id = $1
            "#,
        )
        .bind(guild_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
