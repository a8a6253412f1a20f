//! PostgreSQL implementation of SeasonRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use podium_core::entities::{Season, SeasonStatus};
use podium_core::traits::{RepoResult, SeasonRepository};
use podium_core::value_objects::Snowflake;

use crate::mappers::{season_from_model, SeasonInsert};
use crate::models::SeasonModel;

use super::error::map_db_error;

/// PostgreSQL implementation of SeasonRepository
#[derive(Clone)]
pub struct PgSeasonRepository {
    pool: PgPool,
}

impl PgSeasonRepository {
    /// Create a new PgSeasonRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeasonRepository for PgSeasonRepository {
    #[instrument(skip(self, season), fields(season_id = %season.id, guild_id = %season.guild_id))]
    async fn insert(&self, season: &Season) -> RepoResult<()> {
        let row = SeasonInsert::new(season);

        sqlx::query(
            r#"
            INSERT INTO seasons (id, guild_id, started_at, ends_at, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(row.id)
        .bind(row.guild_id)
        .bind(row.started_at)
        .bind(row.ends_at)
        .bind(row.status)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: Snowflake, status: SeasonStatus) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE seasons SET status = $2 WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_open(&self) -> RepoResult<Vec<Season>> {
        let models = sqlx::query_as::<_, SeasonModel>(
            r#"
            SELECT id, guild_id, started_at, ends_at, status
            FROM seasons
            WHERE status != 'ARCHIVED'
            ORDER BY guild_id, started_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(season_from_model).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Season>> {
        let models = sqlx::query_as::<_, SeasonModel>(
            r#"
            SELECT id, guild_id, started_at, ends_at, status
            FROM seasons
            WHERE guild_id = $1
            ORDER BY started_at DESC
            "#,
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(season_from_model).collect()
    }
}
