use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool, sqlite::SqlitePoolOptions};
use tracing::info;

use super::{Submission, SubmissionKind, SubmissionTable};

/// Submissions stored one table per kind in a single SQLite database.
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // An in-memory database lives only as long as its one connection.
        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = options
            .connect(database_url)
            .await
            .context("failed to open SQLite database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        info!(in_memory, "submission tables ready");
        Ok(Self { pool })
    }

    pub async fn append(&self, submission: &Submission) -> Result<()> {
        let kind = submission.kind();
        let mut query = sqlx::query(insert_sql(kind));
        for value in submission.to_row() {
            query = query.bind(value);
        }

        query
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to insert {} row", kind.key()))?;

        Ok(())
    }

    pub async fn list_all(&self, kind: SubmissionKind) -> Result<SubmissionTable> {
        let rows = sqlx::query(select_sql(kind))
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to load {} rows", kind.key()))?;

        let mut table = SubmissionTable::empty(kind);
        for row in rows {
            let values = (0..row.len())
                .map(|idx| row.try_get::<String, _>(idx))
                .collect::<sqlx::Result<Vec<_>>>()
                .with_context(|| format!("failed to decode {} row", kind.key()))?;
            table.rows.push(values);
        }

        Ok(table)
    }
}

fn insert_sql(kind: SubmissionKind) -> &'static str {
    match kind {
        SubmissionKind::Stories => {
            "INSERT INTO story_submissions (uploaded_at, name, email, title, filename) VALUES (?, ?, ?, ?, ?)"
        }
        SubmissionKind::Casting => {
            "INSERT INTO casting_applications (created_at, name, age, city, experience, profile_link) VALUES (?, ?, ?, ?, ?, ?)"
        }
        SubmissionKind::Contact => {
            "INSERT INTO contact_messages (created_at, name, email, message) VALUES (?, ?, ?, ?)"
        }
    }
}

fn select_sql(kind: SubmissionKind) -> &'static str {
    match kind {
        SubmissionKind::Stories => {
            "SELECT uploaded_at, name, email, title, filename FROM story_submissions ORDER BY uploaded_at DESC, id DESC"
        }
        SubmissionKind::Casting => {
            "SELECT created_at, name, age, city, experience, profile_link FROM casting_applications ORDER BY created_at DESC, id DESC"
        }
        SubmissionKind::Contact => {
            "SELECT created_at, name, email, message FROM contact_messages ORDER BY created_at DESC, id DESC"
        }
    }
}
