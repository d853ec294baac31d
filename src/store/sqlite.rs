//! SQLite-backed [`SubmissionStore`] implementation.
//!
//! Wraps a [`SqlitePool`] and translates every store method into SQL
//! against the schema created by [`crate::migrate`]. Submission + files
//! persistence runs inside one transaction so concurrent corpus reads see
//! all of a submission's files or none of them.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::models::{Owner, Submission, SubmissionSummary, SubmittedFile};

use super::{IdentityResolver, SubmissionStore};

/// SQLite implementation of [`SubmissionStore`] and [`IdentityResolver`].
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[async_trait]
impl IdentityResolver for SqliteStore {
    async fn owner_exists(&self, owner_id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM owners WHERE id = ?")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[async_trait]
impl SubmissionStore for SqliteStore {
    async fn add_submission(
        &self,
        submission: &Submission,
        files: &[SubmittedFile],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO submissions (id, owner_id, name, submitted_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&submission.id)
        .bind(&submission.owner_id)
        .bind(&submission.name)
        .bind(submission.submitted_at)
        .execute(&mut *tx)
        .await?;

        for file in files {
            sqlx::query(
                r#"
                INSERT INTO submitted_files (id, submission_id, name, content, content_hash)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&file.id)
            .bind(&file.submission_id)
            .bind(&file.name)
            .bind(&file.content)
            .bind(&file.content_hash)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn corpus_excluding(
        &self,
        exclude_owner_ids: &HashSet<String>,
        exclude_file_ids: &HashSet<String>,
    ) -> Result<Vec<SubmittedFile>> {
        let mut sql = String::from(
            "SELECT f.id, f.submission_id, f.name, f.content, f.content_hash \
             FROM submitted_files f \
             JOIN submissions s ON s.id = f.submission_id",
        );

        // NOT IN () is not valid SQLite, so clauses are added only for
        // non-empty exclusion sets.
        let mut conditions = Vec::new();
        if !exclude_owner_ids.is_empty() {
            conditions.push(format!(
                "s.owner_id NOT IN ({})",
                placeholders(exclude_owner_ids.len())
            ));
        }
        if !exclude_file_ids.is_empty() {
            conditions.push(format!(
                "f.id NOT IN ({})",
                placeholders(exclude_file_ids.len())
            ));
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY s.submitted_at ASC, f.id ASC");

        let mut query = sqlx::query(&sql);
        for owner_id in exclude_owner_ids {
            query = query.bind(owner_id);
        }
        for file_id in exclude_file_ids {
            query = query.bind(file_id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        let files = rows
            .iter()
            .map(|row| SubmittedFile {
                id: row.get("id"),
                submission_id: row.get("submission_id"),
                name: row.get("name"),
                content: row.get("content"),
                content_hash: row.get("content_hash"),
            })
            .collect();

        Ok(files)
    }

    async fn list_submissions(&self) -> Result<Vec<SubmissionSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.owner_id, s.name, s.submitted_at, COUNT(f.id) AS file_count
            FROM submissions s
            LEFT JOIN submitted_files f ON f.submission_id = s.id
            GROUP BY s.id
            ORDER BY s.submitted_at DESC, s.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let summaries = rows
            .iter()
            .map(|row| {
                let file_count: i64 = row.get("file_count");
                SubmissionSummary {
                    id: row.get("id"),
                    owner_id: row.get("owner_id"),
                    name: row.get("name"),
                    submitted_at: row.get("submitted_at"),
                    file_count: file_count as u32,
                }
            })
            .collect();

        Ok(summaries)
    }

    async fn add_owner(&self, owner: &Owner) -> Result<()> {
        sqlx::query("INSERT INTO owners (id, name, registered_at) VALUES (?, ?, ?)")
            .bind(&owner.id)
            .bind(&owner.name)
            .bind(owner.registered_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_owners(&self) -> Result<Vec<Owner>> {
        let rows =
            sqlx::query("SELECT id, name, registered_at FROM owners ORDER BY registered_at, id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .iter()
            .map(|row| Owner {
                id: row.get("id"),
                name: row.get("name"),
                registered_at: row.get("registered_at"),
            })
            .collect())
    }
}
