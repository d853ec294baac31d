//! Core data models used throughout labscan.
//!
//! These types represent the owners, submissions, files, and match records
//! that flow through the ingestion and analysis pipeline.

use serde::Serialize;

/// A registered submitter. Submissions are only accepted for known owners.
#[derive(Debug, Clone)]
pub struct Owner {
    pub id: String,
    pub name: String,
    pub registered_at: i64,
}

/// One ingestion batch. Created once, never mutated; `owner_id` is fixed
/// for the lifetime of the record.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub submitted_at: i64,
}

/// A single decoded file belonging to a submission.
#[derive(Debug, Clone)]
pub struct SubmittedFile {
    pub id: String,
    pub submission_id: String,
    pub name: String,
    pub content: String,
    /// SHA-256 of `content`, stored for diagnostics and dedup inspection.
    pub content_hash: String,
}

/// A duplicate-line match between one corpus file and one candidate file
/// from the newly ingested batch.
///
/// `duplicated_lines` is lexicographically sorted so repeated runs against
/// an unchanged corpus produce identical output. `duplicate_percentage` is
/// computed over the candidate file's unique-line count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMatch {
    /// Corpus-side file id.
    pub file_id: String,
    /// Candidate-side file id (from the batch just ingested).
    pub duplicate_with: String,
    pub duplicated_lines: Vec<String>,
    pub duplicate_percentage: f32,
}

/// The aggregate outcome of one analysis run. An empty `matches` list is a
/// normal successful result, not an error.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub matches: Vec<FileMatch>,
}

/// Lightweight submission row for listings — skips file contents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSummary {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub submitted_at: i64,
    pub file_count: u32,
}
