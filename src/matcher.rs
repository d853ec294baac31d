//! Pairwise duplicate-line matching.
//!
//! Compares every corpus file against every file in the newly ingested
//! batch using their distinct-line sets. A non-empty intersection emits a
//! [`FileMatch`] with the shared lines (lexicographically sorted) and the
//! duplication percentage measured from the candidate's point of view:
//! `|intersection| / |candidate lines| * 100`.
//!
//! Matching is one-directional per run (corpus file → candidate file); the
//! mirrored direction is not emitted. Complexity is O(|corpus| × |batch|)
//! set intersections, which is fine for corpora held in memory.

use std::collections::HashSet;

use crate::lines::line_set;
use crate::models::{FileMatch, SubmittedFile};

/// Match `corpus` files against the `batch` candidates.
///
/// Matches below `min_percentage` are dropped (0.0 keeps every non-empty
/// intersection). Emission order follows corpus order then batch order, so
/// output is reproducible given deterministic inputs.
pub fn match_against_corpus(
    corpus: &[SubmittedFile],
    batch: &[SubmittedFile],
    min_percentage: f32,
) -> Vec<FileMatch> {
    // Candidate line sets are reused across the whole corpus scan.
    let candidates: Vec<(&SubmittedFile, HashSet<String>)> =
        batch.iter().map(|f| (f, line_set(&f.content))).collect();

    let mut matches = Vec::new();
    for corpus_file in corpus {
        let corpus_lines = line_set(&corpus_file.content);

        for (candidate, candidate_lines) in &candidates {
            // Structurally impossible given the exclusion query, kept as a
            // guard against a misbehaving store.
            if corpus_file.id == candidate.id {
                continue;
            }

            let mut duplicated: Vec<String> = corpus_lines
                .intersection(candidate_lines)
                .cloned()
                .collect();
            if duplicated.is_empty() {
                continue;
            }
            duplicated.sort();

            // A non-empty intersection implies a non-empty candidate set.
            let percentage =
                duplicated.len() as f32 / candidate_lines.len() as f32 * 100.0;
            if percentage < min_percentage {
                continue;
            }

            matches.push(FileMatch {
                file_id: corpus_file.id.clone(),
                duplicate_with: candidate.id.clone(),
                duplicated_lines: duplicated,
                duplicate_percentage: percentage,
            });
        }
    }

    matches
}
