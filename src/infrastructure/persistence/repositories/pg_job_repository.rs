use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, JobTransition, ListOptions, RepositoryError};
use crate::domain::{Job, JobId, JobState};

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    job_type: String,
    state: String,
    result: Option<String>,
    error_message: Option<String>,
    claimed_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = RepositoryError;

    fn try_from(r: JobRow) -> Result<Self, Self::Error> {
        let state = r
            .state
            .parse::<JobState>()
            .map_err(RepositoryError::QueryFailed)?;

        Ok(Job {
            id: JobId::from_uuid(r.id),
            job_type: r.job_type,
            state,
            result: r.result,
            error_message: r.error_message,
            claimed_by: r.claimed_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO jobs
                (id, job_type, state, result, error_message, claimed_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(&job.job_type)
        .bind(job.state.as_str())
        .bind(&job.result)
        .bind(&job.error_message)
        .bind(&job.claimed_by)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!("job {} already exists", job.id))
            }
            _ => RepositoryError::QueryFailed(e.to_string()),
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, job_type, state, result, error_message, claimed_by, created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(Job::try_from).transpose()
    }

    #[instrument(
        skip(self, transition),
        fields(job_id = %id, from = %transition.expected, to = %transition.next)
    )]
    async fn transition(
        &self,
        id: JobId,
        transition: JobTransition,
    ) -> Result<Job, RepositoryError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs
            SET state = $1,
                result = COALESCE($2, result),
                error_message = COALESCE($3, error_message),
                claimed_by = COALESCE($4, claimed_by),
                updated_at = $5
            WHERE id = $6 AND state = $7 AND ($8::TEXT IS NULL OR claimed_by = $8)
            RETURNING id, job_type, state, result, error_message, claimed_by, created_at, updated_at
            "#,
        )
        .bind(transition.next.as_str())
        .bind(transition.result.as_deref())
        .bind(transition.error_message.as_deref())
        .bind(transition.claim.as_deref())
        .bind(Utc::now())
        .bind(id.as_uuid())
        .bind(transition.expected.as_str())
        .bind(transition.owner.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if let Some(r) = row {
            return Job::try_from(r);
        }

        match self.get_by_id(id).await? {
            Some(current) if current.state != transition.expected => {
                Err(RepositoryError::InvalidTransition {
                    job_id: id,
                    from: current.state,
                    to: transition.next,
                })
            }
            Some(_) => Err(RepositoryError::Conflict(format!(
                "job {} is not claimed by {}",
                id,
                transition.owner.as_deref().unwrap_or_default()
            ))),
            None => Err(RepositoryError::NotFound(format!("job {}", id))),
        }
    }

    #[instrument(skip(self), fields(limit = options.limit, offset = options.offset))]
    async fn list(&self, options: ListOptions) -> Result<Vec<Job>, RepositoryError> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, job_type, state, result, error_message, claimed_by, created_at, updated_at
            FROM jobs
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(options.limit))
        .bind(i64::from(options.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.into_iter().map(Job::try_from).collect()
    }

    #[instrument(skip(self), fields(state = %state))]
    async fn list_by_state(&self, state: JobState) -> Result<Vec<Job>, RepositoryError> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, job_type, state, result, error_message, claimed_by, created_at, updated_at
            FROM jobs
            WHERE state = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(state.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.into_iter().map(Job::try_from).collect()
    }
}
