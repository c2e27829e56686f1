use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A tutor assigned to a student by the matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAssignment {
    pub id: Uuid,
    pub student_id: String,
    pub tutor_id: String,
    pub tutor_name: String,
    pub compatibility_score: i32,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}

/// PostgreSQL client for the match history log
///
/// Every assignment made by the matching endpoint is appended here, so a
/// student's previous tutors survive later re-matches that overwrite the
/// assignment on the student record.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Append an assignment to the history log
    pub async fn record_assignment(
        &self,
        student_id: &str,
        tutor_id: &str,
        tutor_name: &str,
        compatibility_score: u32,
    ) -> Result<Uuid, PostgresError> {
        let score = i32::try_from(compatibility_score)
            .map_err(|_| PostgresError::InvalidInput(format!("Score out of range: {}", compatibility_score)))?;

        let query = r#"
            INSERT INTO match_assignments (id, student_id, tutor_id, tutor_name, compatibility_score, assigned_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
        "#;

        let id = Uuid::new_v4();

        sqlx::query(query)
            .bind(id)
            .bind(student_id)
            .bind(tutor_id)
            .bind(tutor_name)
            .bind(score)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded assignment: {} -> {} (score {})",
            student_id,
            tutor_id,
            compatibility_score
        );

        Ok(id)
    }

    /// Get a student's assignments, newest first
    pub async fn get_history(
        &self,
        student_id: &str,
        limit: usize,
    ) -> Result<Vec<MatchAssignment>, PostgresError> {
        let query = r#"
            SELECT id, student_id, tutor_id, tutor_name, compatibility_score, assigned_at
            FROM match_assignments
            WHERE student_id = $1
            ORDER BY assigned_at DESC
            LIMIT $2
        "#;

        let rows = sqlx::query(query)
            .bind(student_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let history = rows
            .iter()
            .map(|row| MatchAssignment {
                id: row.get("id"),
                student_id: row.get("student_id"),
                tutor_id: row.get("tutor_id"),
                tutor_name: row.get("tutor_name"),
                compatibility_score: row.get("compatibility_score"),
                assigned_at: row.get("assigned_at"),
            })
            .collect();

        Ok(history)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
