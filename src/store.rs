use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::configuration::DatabaseSettings;
use crate::domain::NewSubmission;

/// A contact-form entry as it is stored. Never updated once written.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<&NewSubmission> for Submission {
    fn from(new_submission: &NewSubmission) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new_submission.name.as_ref().to_owned(),
            email: new_submission.email.as_ref().to_owned(),
            phone: new_submission
                .phone
                .as_ref()
                .map(|phone| phone.as_ref().to_owned()),
            message: new_submission.message.as_ref().to_owned(),
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert(&self, submission: &Submission) -> Result<(), anyhow::Error>;

    async fn is_connected(&self) -> bool;
}

pub struct PostgresSubmissionStore {
    pool: PgPool,
}

impl PostgresSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The pool connects on first use, so a database that is down at boot
    /// only fails the requests that need it.
    pub fn connect_lazy(configuration: &DatabaseSettings) -> Self {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(configuration.acquire_timeout())
            .connect_lazy_with(configuration.with_db());
        Self::new(pool)
    }
}

#[async_trait]
impl SubmissionStore for PostgresSubmissionStore {
    #[tracing::instrument(
        name = "Saving new submission in the database",
        skip(self, submission),
        fields(submission_id = %submission.id)
    )]
    async fn insert(&self, submission: &Submission) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            INSERT INTO submissions (id, name, email, phone, message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(submission.id)
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.phone)
        .bind(&submission.message)
        .bind(submission.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert the submission in the database")?;
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error.cause_chain = ?e, "Database is unreachable");
                false
            }
        }
    }
}
