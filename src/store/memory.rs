//! In-memory [`SubmissionStore`] implementation for tests.
//!
//! All tables live behind a single `std::sync::RwLock`, so a submission and
//! its files become visible to readers in one step — the same all-or-none
//! guarantee the SQLite backend gets from a transaction.

use std::collections::HashSet;
use std::sync::RwLock;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::models::{Owner, Submission, SubmissionSummary, SubmittedFile};

use super::{IdentityResolver, SubmissionStore};

#[derive(Default)]
struct Tables {
    owners: Vec<Owner>,
    submissions: Vec<Submission>,
    files: Vec<SubmittedFile>,
}

/// In-memory store backing unit and pipeline tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of persisted files. Used by tests asserting that failed
    /// ingestions leave the store untouched.
    pub fn file_count(&self) -> usize {
        self.tables.read().unwrap().files.len()
    }
}

#[async_trait]
impl IdentityResolver for MemoryStore {
    async fn owner_exists(&self, owner_id: &str) -> Result<bool> {
        let tables = self.tables.read().unwrap();
        Ok(tables.owners.iter().any(|o| o.id == owner_id))
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn add_submission(
        &self,
        submission: &Submission,
        files: &[SubmittedFile],
    ) -> Result<()> {
        let mut tables = self.tables.write().unwrap();
        tables.submissions.push(submission.clone());
        tables.files.extend(files.iter().cloned());
        Ok(())
    }

    async fn corpus_excluding(
        &self,
        exclude_owner_ids: &HashSet<String>,
        exclude_file_ids: &HashSet<String>,
    ) -> Result<Vec<SubmittedFile>> {
        let tables = self.tables.read().unwrap();

        let excluded_submissions: HashSet<&str> = tables
            .submissions
            .iter()
            .filter(|s| exclude_owner_ids.contains(&s.owner_id))
            .map(|s| s.id.as_str())
            .collect();

        let mut corpus: Vec<(i64, SubmittedFile)> = tables
            .files
            .iter()
            .filter(|f| {
                !excluded_submissions.contains(f.submission_id.as_str())
                    && !exclude_file_ids.contains(&f.id)
            })
            .map(|f| {
                let submitted_at = tables
                    .submissions
                    .iter()
                    .find(|s| s.id == f.submission_id)
                    .map(|s| s.submitted_at)
                    .unwrap_or(0);
                (submitted_at, f.clone())
            })
            .collect();

        corpus.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
        Ok(corpus.into_iter().map(|(_, f)| f).collect())
    }

    async fn list_submissions(&self) -> Result<Vec<SubmissionSummary>> {
        let tables = self.tables.read().unwrap();
        let mut summaries: Vec<SubmissionSummary> = tables
            .submissions
            .iter()
            .map(|s| SubmissionSummary {
                id: s.id.clone(),
                owner_id: s.owner_id.clone(),
                name: s.name.clone(),
                submitted_at: s.submitted_at,
                file_count: tables
                    .files
                    .iter()
                    .filter(|f| f.submission_id == s.id)
                    .count() as u32,
            })
            .collect();
        summaries.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }

    async fn add_owner(&self, owner: &Owner) -> Result<()> {
        let mut tables = self.tables.write().unwrap();
        if tables.owners.iter().any(|o| o.id == owner.id) {
            bail!("owner id already registered: {}", owner.id);
        }
        tables.owners.push(owner.clone());
        Ok(())
    }

    async fn list_owners(&self) -> Result<Vec<Owner>> {
        let tables = self.tables.read().unwrap();
        let mut owners = tables.owners.clone();
        owners.sort_by(|a, b| a.registered_at.cmp(&b.registered_at).then_with(|| a.id.cmp(&b.id)));
        Ok(owners)
    }
}
