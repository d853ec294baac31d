//! Storage abstraction for labscan.
//!
//! The [`SubmissionStore`] trait defines all persistence operations needed
//! by the ingestion and matching pipeline, enabling pluggable backends
//! (SQLite, in-memory for tests). [`IdentityResolver`] is kept as a
//! separate trait so a transport layer with its own identity system can
//! inject a different resolver without touching the store.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;
pub mod sqlite;

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Owner, Submission, SubmissionSummary, SubmittedFile};

/// Resolves owner identities ahead of ingestion.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Whether `owner_id` refers to a registered owner.
    async fn owner_exists(&self, owner_id: &str) -> Result<bool>;
}

/// Abstract persistence backend for submissions and their files.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`add_submission`](SubmissionStore::add_submission) | Persist a submission and all its files atomically |
/// | [`corpus_excluding`](SubmissionStore::corpus_excluding) | Fetch the comparison corpus minus excluded owners/files |
/// | [`list_submissions`](SubmissionStore::list_submissions) | List all submissions with file counts |
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist `submission` and all of `files` as one atomic operation.
    ///
    /// A concurrent [`corpus_excluding`](SubmissionStore::corpus_excluding)
    /// call must observe either all of the submission's files or none of
    /// them, never a partial set.
    async fn add_submission(
        &self,
        submission: &Submission,
        files: &[SubmittedFile],
    ) -> Result<()>;

    /// Return every persisted file whose owning submission's `owner_id` is
    /// not in `exclude_owner_ids` and whose own id is not in
    /// `exclude_file_ids`.
    ///
    /// Results are ordered by (submission `submitted_at`, file id) so match
    /// emission is reproducible across runs.
    async fn corpus_excluding(
        &self,
        exclude_owner_ids: &HashSet<String>,
        exclude_file_ids: &HashSet<String>,
    ) -> Result<Vec<SubmittedFile>>;

    /// List all submissions, newest first, with per-submission file counts.
    async fn list_submissions(&self) -> Result<Vec<SubmissionSummary>>;

    /// Register an owner. Fails if the id is already taken.
    async fn add_owner(&self, owner: &Owner) -> Result<()>;

    /// List all registered owners, ordered by registration time.
    async fn list_owners(&self) -> Result<Vec<Owner>>;
}
