//! Line-set extraction.
//!
//! Turns raw file content into the set of distinct lines used by the
//! matcher. Lines are split on `\r\n`, `\r`, or `\n` (a CRLF pair counts as
//! a single boundary). No normalization is applied: no trimming, no case
//! folding, and an empty line is a valid set element. Deterministic, no
//! failure mode — empty content yields an empty set.

use std::collections::HashSet;

/// Extract the set of distinct lines from `content`.
///
/// The segment after the final terminator is always included, so content
/// ending in a newline contributes an empty line (`"a\n"` → `{"a", ""}`).
pub fn line_set(content: &str) -> HashSet<String> {
    let mut lines = HashSet::new();
    if content.is_empty() {
        return lines;
    }

    let bytes = content.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                lines.insert(content[start..i].to_string());
                // CRLF is one boundary, not two
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            b'\n' => {
                lines.insert(content[start..i].to_string());
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.insert(content[start..].to_string());
    lines
}
