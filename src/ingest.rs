//! Submission ingestion.
//!
//! Validates and decodes an incoming payload (filename → base64 content),
//! then persists the submission and all its files through one atomic store
//! operation. Decoding happens strictly before the commit: if any payload
//! is invalid, the whole batch is rejected and nothing is persisted.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Submission, SubmittedFile};
use crate::store::SubmissionStore;

/// Decode a raw payload into a [`Submission`] and its files, without
/// touching storage.
///
/// Entries are processed in lexicographic filename order so a given payload
/// always produces the same batch apart from generated ids. Fails with
/// [`Error::Decode`] on the first file that is not valid base64-encoded
/// UTF-8 text.
pub fn decode_batch(
    owner_id: &str,
    name: &str,
    files: &HashMap<String, String>,
) -> Result<(Submission, Vec<SubmittedFile>)> {
    let submission = Submission {
        id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        name: name.to_string(),
        submitted_at: Utc::now().timestamp(),
    };

    let mut names: Vec<&String> = files.keys().collect();
    names.sort();

    let mut decoded = Vec::with_capacity(files.len());
    for file_name in names {
        let payload = &files[file_name];
        let bytes = STANDARD.decode(payload).map_err(|e| Error::Decode {
            file: file_name.clone(),
            reason: e.to_string(),
        })?;
        let content = String::from_utf8(bytes).map_err(|e| Error::Decode {
            file: file_name.clone(),
            reason: e.to_string(),
        })?;

        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let content_hash = format!("{:x}", hasher.finalize());

        decoded.push(SubmittedFile {
            id: Uuid::new_v4().to_string(),
            submission_id: submission.id.clone(),
            name: file_name.clone(),
            content,
            content_hash,
        });
    }

    Ok((submission, decoded))
}

/// Decode `files` and persist the resulting submission atomically.
///
/// Returns the persisted files so the caller can run matching immediately
/// without a second read.
pub async fn ingest_submission(
    store: &dyn SubmissionStore,
    owner_id: &str,
    name: &str,
    files: &HashMap<String, String>,
) -> Result<(Submission, Vec<SubmittedFile>)> {
    let (submission, decoded) = decode_batch(owner_id, name, files)?;

    store
        .add_submission(&submission, &decoded)
        .await
        .map_err(Error::Persistence)?;

    tracing::debug!(
        submission_id = %submission.id,
        owner_id,
        files = decoded.len(),
        "submission persisted"
    );

    Ok((submission, decoded))
}
