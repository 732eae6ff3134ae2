use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    error::{AppError, AppResult},
    models::Recommendation,
};

use super::{RecommendationFilter, RecommendationRepository};

const COLUMNS: &str =
    r#"rec_id, source_pid, name, recommendation_name, "type", number_of_likes, number_of_dislikes"#;

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Creates the schema if it does not exist yet
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Recommendation storage backed by PostgreSQL
///
/// Each call is one autocommitted statement against the shared pool.
#[derive(Clone)]
pub struct PgRecommendationRepository {
    pool: PgPool,
}

impl PgRecommendationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecommendationRepository for PgRecommendationRepository {
    async fn create(&self, recommendation: Recommendation) -> AppResult<Recommendation> {
        tracing::info!(name = %recommendation.recommendation_name, "Creating recommendation");

        let sql = format!(
            r#"INSERT INTO recommendations
                (source_pid, name, recommendation_name, "type", number_of_likes, number_of_dislikes)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {COLUMNS}"#
        );

        let created = sqlx::query_as::<_, Recommendation>(&sql)
            .bind(recommendation.source_pid)
            .bind(&recommendation.name)
            .bind(&recommendation.recommendation_name)
            .bind(recommendation.kind)
            .bind(recommendation.number_of_likes)
            .bind(recommendation.number_of_dislikes)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn update(&self, recommendation: &Recommendation) -> AppResult<Recommendation> {
        let rec_id = recommendation.rec_id.ok_or_else(|| {
            AppError::Internal("cannot update a recommendation without rec_id".to_string())
        })?;

        tracing::info!(rec_id, name = %recommendation.recommendation_name, "Saving recommendation");

        let sql = format!(
            r#"UPDATE recommendations
               SET source_pid = $1, name = $2, recommendation_name = $3, "type" = $4,
                   number_of_likes = $5, number_of_dislikes = $6
               WHERE rec_id = $7
               RETURNING {COLUMNS}"#
        );

        sqlx::query_as::<_, Recommendation>(&sql)
            .bind(recommendation.source_pid)
            .bind(&recommendation.name)
            .bind(&recommendation.recommendation_name)
            .bind(recommendation.kind)
            .bind(recommendation.number_of_likes)
            .bind(recommendation.number_of_dislikes)
            .bind(rec_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Recommendation with id '{rec_id}' was not found.")))
    }

    async fn delete(&self, recommendation: &Recommendation) -> AppResult<()> {
        let rec_id = recommendation.rec_id.ok_or_else(|| {
            AppError::Internal("cannot delete a recommendation without rec_id".to_string())
        })?;

        tracing::info!(rec_id, name = %recommendation.recommendation_name, "Deleting recommendation");

        let result = sqlx::query("DELETE FROM recommendations WHERE rec_id = $1")
            .bind(rec_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Recommendation with id '{rec_id}' was not found."
            )));
        }

        Ok(())
    }

    async fn find(&self, rec_id: i64) -> AppResult<Option<Recommendation>> {
        tracing::debug!(rec_id, "Processing lookup by id");

        let sql = format!("SELECT {COLUMNS} FROM recommendations WHERE rec_id = $1");
        let found = sqlx::query_as::<_, Recommendation>(&sql)
            .bind(rec_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found)
    }

    async fn all(&self) -> AppResult<Vec<Recommendation>> {
        tracing::debug!("Processing all recommendations");

        let sql = format!("SELECT {COLUMNS} FROM recommendations ORDER BY rec_id");
        let rows = sqlx::query_as::<_, Recommendation>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn find_by(&self, filter: &RecommendationFilter) -> AppResult<Vec<Recommendation>> {
        tracing::debug!(?filter, "Processing filtered lookup");

        let sql = format!(
            "SELECT {COLUMNS} FROM recommendations WHERE {} = $1 ORDER BY rec_id",
            filter.column()
        );
        let query = sqlx::query_as::<_, Recommendation>(&sql);
        let query = match filter {
            RecommendationFilter::Name(value) | RecommendationFilter::RecommendationName(value) => {
                query.bind(value.as_str())
            }
            RecommendationFilter::SourcePid(pid) => query.bind(*pid),
            RecommendationFilter::Type(kind) => query.bind(*kind),
        };

        Ok(query.fetch_all(&self.pool).await?)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
