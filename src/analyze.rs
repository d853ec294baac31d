//! Analysis pipeline orchestration.
//!
//! One linear pass per request: resolve owner → ingest → corpus query →
//! match → aggregate. Each stage either completes or the whole operation
//! fails; there are no retries or alternate states. The storage awaits
//! race against the caller's cancellation token and bail out with
//! [`Error::Cancelled`], returning no partial result.
//!
//! Persistence commits before the corpus read runs. If that read fails the
//! submission stays durably stored and the error is surfaced as-is
//! (best-effort-after-commit); duplicate detection is advisory, so a
//! concurrently persisted file missed by the read is accepted rather than
//! treated as a consistency bug.

use std::collections::{HashMap, HashSet};

use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::ingest::ingest_submission;
use crate::matcher::match_against_corpus;
use crate::models::AnalysisResult;
use crate::store::{IdentityResolver, SubmissionStore};

/// Ingest a submission for `owner_id` and compute duplicate-line matches
/// against every corpus file belonging to other owners.
///
/// The exclusion query filters out the batch owner's files by owner id, so
/// prior submissions from the same owner never appear on the corpus side,
/// and the just-ingested file ids are excluded as well.
pub async fn run_analysis(
    store: &dyn SubmissionStore,
    identity: &dyn IdentityResolver,
    owner_id: &str,
    name: &str,
    files: &HashMap<String, String>,
    min_percentage: f32,
    cancel: &CancellationToken,
) -> Result<AnalysisResult> {
    // biased: a token cancelled before a stage starts must win over a
    // storage future that is already ready.
    let known = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(Error::Cancelled),
        res = identity.owner_exists(owner_id) => res.map_err(Error::Persistence)?,
    };
    if !known {
        return Err(Error::OwnerNotFound(owner_id.to_string()));
    }

    let (submission, batch) = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(Error::Cancelled),
        res = ingest_submission(store, owner_id, name, files) => res?,
    };

    let exclude_owners: HashSet<String> = [owner_id.to_string()].into();
    let exclude_files: HashSet<String> = batch.iter().map(|f| f.id.clone()).collect();

    let corpus = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(Error::Cancelled),
        res = store.corpus_excluding(&exclude_owners, &exclude_files) => {
            res.map_err(Error::Persistence)?
        }
    };

    let matches = match_against_corpus(&corpus, &batch, min_percentage);
    tracing::info!(
        submission_id = %submission.id,
        owner_id,
        corpus_files = corpus.len(),
        batch_files = batch.len(),
        matches = matches.len(),
        "analysis complete"
    );

    Ok(AnalysisResult { matches })
}
