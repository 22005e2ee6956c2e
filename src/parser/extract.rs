//! Abstract span computation and normalization.

use std::ops::Range;

use super::anchor::locate_anchors;

/// Blank line separating the blocks of a record.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Half-open byte range `[start, end)` holding one record's abstract body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbstractSpan {
    pub start: usize,
    pub end: usize,
}

impl AbstractSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// How to treat an abstract that runs into end-of-corpus without a
/// terminating blank line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TruncationPolicy {
    /// Report the record as malformed.
    #[default]
    Skip,
    /// End the span at end-of-corpus.
    ClampToEnd,
}

/// A record whose abstract boundaries could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRecord {
    /// No blank line after the author-information marker.
    #[error("no blank line after the author information at offset {anchor}")]
    MissingAbstractStart { anchor: usize },

    /// The abstract body is not followed by a blank line.
    #[error("abstract starting at offset {start} is not terminated by a blank line")]
    MissingAbstractEnd { anchor: usize, start: usize },
}

impl MalformedRecord {
    /// Anchor offset of the offending record.
    pub fn anchor(&self) -> usize {
        match self {
            MalformedRecord::MissingAbstractStart { anchor }
            | MalformedRecord::MissingAbstractEnd { anchor, .. } => *anchor,
        }
    }
}

/// Compute one span per anchor using [`TruncationPolicy::Skip`].
pub fn extract_spans(
    corpus: &str,
    anchors: &[usize],
) -> Vec<Result<AbstractSpan, MalformedRecord>> {
    extract_spans_with(corpus, anchors, TruncationPolicy::Skip)
}

/// Compute one span per anchor.
///
/// The result always has the same length and order as `anchors`; records
/// that cannot be delimited appear as `Err` at their position.
pub fn extract_spans_with(
    corpus: &str,
    anchors: &[usize],
    policy: TruncationPolicy,
) -> Vec<Result<AbstractSpan, MalformedRecord>> {
    anchors
        .iter()
        .map(|&anchor| span_for_anchor(corpus, anchor, policy))
        .collect()
}

fn span_for_anchor(
    corpus: &str,
    anchor: usize,
    policy: TruncationPolicy,
) -> Result<AbstractSpan, MalformedRecord> {
    let tail = corpus
        .get(anchor..)
        .ok_or(MalformedRecord::MissingAbstractStart { anchor })?;
    let start = tail
        .find(BLOCK_SEPARATOR)
        .map(|offset| anchor + offset + BLOCK_SEPARATOR.len())
        .ok_or(MalformedRecord::MissingAbstractStart { anchor })?;

    let end = match corpus[start..].find(BLOCK_SEPARATOR) {
        Some(offset) => start + offset,
        None => match policy {
            TruncationPolicy::ClampToEnd => corpus.len(),
            TruncationPolicy::Skip => {
                return Err(MalformedRecord::MissingAbstractEnd { anchor, start })
            }
        },
    };

    Ok(AbstractSpan { start, end })
}

/// Slice `span` out of `corpus` and replace every newline with a space.
///
/// No other whitespace is touched.
pub fn materialize(corpus: &str, span: &AbstractSpan) -> String {
    corpus[span.range()].replace('\n', " ")
}

/// Outcome of running the locator and extractor over a whole corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Number of author-information markers found.
    pub anchors: usize,
    /// Normalized abstracts in document order.
    pub abstracts: Vec<String>,
    /// Records that were skipped.
    pub malformed: Vec<MalformedRecord>,
}

/// Locate, delimit and normalize every abstract in `corpus`.
pub fn extract_abstracts(corpus: &str, policy: TruncationPolicy) -> Extraction {
    let anchors = locate_anchors(corpus);
    let mut extraction = Extraction {
        anchors: anchors.len(),
        ..Default::default()
    };

    for span in extract_spans_with(corpus, &anchors, policy) {
        match span {
            Ok(span) => extraction.abstracts.push(materialize(corpus, &span)),
            Err(err) => {
                tracing::warn!(anchor = err.anchor(), "Skipping malformed record: {}", err);
                extraction.malformed.push(err);
            }
        }
    }

    tracing::debug!(
        anchors = extraction.anchors,
        abstracts = extraction.abstracts.len(),
        skipped = extraction.malformed.len(),
        "Extracted abstracts"
    );

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str =
        "noise\nAuthor information: \nLine1\n\nThis is the abstract.\nMore text.\n\ntrailing";

    fn record(title: &str, body: &str) -> String {
        format!(
            "1. J Test. 2021;3:4.\n\n{title}\n\nDoe J(1).\n\nAuthor information: \n(1)Some University.\n\n{body}\n\nPMID: 1\n\n"
        )
    }

    #[test]
    fn test_scenario_single_record() {
        let anchors = locate_anchors(SCENARIO);
        assert_eq!(anchors.len(), 1);

        let spans = extract_spans(SCENARIO, &anchors);
        let span = spans[0].as_ref().unwrap();
        assert_eq!(
            &SCENARIO[span.range()],
            "This is the abstract.\nMore text."
        );
        assert_eq!(
            materialize(SCENARIO, span),
            "This is the abstract. More text."
        );
    }

    #[test]
    fn test_two_records_in_source_order() {
        let corpus = format!(
            "{}{}",
            record("First title", "Alpha body\nwraps here."),
            record("Second title", "Beta body.")
        );
        let extraction = extract_abstracts(&corpus, TruncationPolicy::Skip);

        assert_eq!(extraction.anchors, 2);
        assert_eq!(
            extraction.abstracts,
            vec!["Alpha body wraps here.".to_string(), "Beta body.".to_string()]
        );
        assert!(extraction.malformed.is_empty());
    }

    #[test]
    fn test_span_count_matches_anchor_count() {
        let corpora = [
            String::new(),
            SCENARIO.to_string(),
            "Author information: \nno blank line".to_string(),
            format!("{}Author information: \nx\n\ny", record("t", "b")),
        ];
        for corpus in &corpora {
            let anchors = locate_anchors(corpus);
            assert_eq!(extract_spans(corpus, &anchors).len(), anchors.len());
            assert_eq!(
                extract_spans_with(corpus, &anchors, TruncationPolicy::ClampToEnd).len(),
                anchors.len()
            );
        }
    }

    #[test]
    fn test_no_anchor_yields_nothing() {
        let extraction = extract_abstracts("Title\n\nBody\n\nPMID: 1", TruncationPolicy::Skip);
        assert_eq!(extraction, Extraction::default());
    }

    #[test]
    fn test_missing_start_is_malformed() {
        let corpus = "Author information: \n(1)Lab only, truncated";
        let anchors = locate_anchors(corpus);
        let spans = extract_spans_with(corpus, &anchors, TruncationPolicy::ClampToEnd);
        assert_eq!(
            spans[0],
            Err(MalformedRecord::MissingAbstractStart { anchor: 21 })
        );
    }

    #[test]
    fn test_missing_end_skipped_by_default() {
        let corpus = format!("{}Author information: \n(1)Lab.\n\nCut short", record("t", "ok"));
        let extraction = extract_abstracts(&corpus, TruncationPolicy::Skip);

        assert_eq!(extraction.anchors, 2);
        assert_eq!(extraction.abstracts, vec!["ok".to_string()]);
        assert_eq!(extraction.malformed.len(), 1);
        assert!(matches!(
            extraction.malformed[0],
            MalformedRecord::MissingAbstractEnd { .. }
        ));
    }

    #[test]
    fn test_missing_end_clamped_when_requested() {
        let corpus = "Author information: \n(1)Lab.\n\nCut\nshort";
        let extraction = extract_abstracts(corpus, TruncationPolicy::ClampToEnd);
        assert_eq!(extraction.abstracts, vec!["Cut short".to_string()]);
        assert!(extraction.malformed.is_empty());
    }

    #[test]
    fn test_empty_abstract_block() {
        // Two separators back to back produce an empty span rather than an error.
        let corpus = "Author information: \n(1)Lab.\n\n\n\nPMID: 1";
        let anchors = locate_anchors(corpus);
        let span = extract_spans(corpus, &anchors)[0].clone().unwrap();
        assert!(span.is_empty());
        assert_eq!(materialize(corpus, &span), "");
    }

    #[test]
    fn test_duplicate_marker_double_counts() {
        let corpus = "Author information: \n(1)A.\nAuthor information: \n(2)B.\n\nShared body.\n\nPMID: 9";
        let extraction = extract_abstracts(corpus, TruncationPolicy::Skip);
        assert_eq!(
            extraction.abstracts,
            vec!["Shared body.".to_string(), "Shared body.".to_string()]
        );
    }

    #[test]
    fn test_materialize_keeps_other_whitespace() {
        let corpus = "Author information: \nx\n\n  spaced\tout \n line\n\n";
        let anchors = locate_anchors(corpus);
        let span = extract_spans(corpus, &anchors)[0].clone().unwrap();
        assert_eq!(materialize(corpus, &span), "  spaced\tout   line");
    }

    #[test]
    fn test_materialize_idempotent_on_flat_text() {
        let flat = "This is the abstract. More text.";
        let span = AbstractSpan {
            start: 0,
            end: flat.len(),
        };
        let once = materialize(flat, &span);
        let twice = materialize(&once, &AbstractSpan { start: 0, end: once.len() });
        assert_eq!(once, flat);
        assert_eq!(twice, once);
    }
}
