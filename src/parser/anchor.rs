//! Record boundary detection.

/// Literal line that precedes the affiliation block of every record.
pub const ANCHOR_MARKER: &str = "Author information: \n";

/// Return the offset immediately after every occurrence of [`ANCHOR_MARKER`].
///
/// Matching is literal, case-sensitive and non-overlapping. Offsets are byte
/// offsets into `corpus` in document order. A record that contains the marker
/// twice yields two anchors; no deduplication is attempted.
pub fn locate_anchors(corpus: &str) -> Vec<usize> {
    corpus
        .match_indices(ANCHOR_MARKER)
        .map(|(start, marker)| start + marker.len())
        .collect()
}
