//! Abstract extraction from PubMed plain-text dumps.
//!
//! `efetch` with `rettype=abstract&retmode=text` returns every record as a
//! block of text: citation line, title, authors, an `Author information:`
//! line followed by affiliations, a blank line, the abstract body, another
//! blank line and finally identifiers. Records are simply concatenated.
//!
//! Extraction happens in two stages:
//!
//! - [`locate_anchors`] finds every author-information marker and returns
//!   the byte offset right after it.
//! - [`extract_spans`] turns each anchor into an [`AbstractSpan`] (the text
//!   between the next two blank lines), and [`materialize`] flattens a span
//!   into a single line.
//!
//! [`extract_abstracts`] runs both stages and skips malformed records.
//!
//! ```rust
//! use pubmed_wordcloud::parser::{extract_abstracts, TruncationPolicy};
//!
//! let corpus = "noise\nAuthor information: \nLine1\n\nThis is the abstract.\nMore text.\n\ntrailing";
//! let extraction = extract_abstracts(corpus, TruncationPolicy::Skip);
//! assert_eq!(extraction.abstracts, vec!["This is the abstract. More text.".to_string()]);
//! ```

mod anchor;
mod extract;

pub use anchor::{locate_anchors, ANCHOR_MARKER};
pub use extract::{
    extract_abstracts, extract_spans, extract_spans_with, materialize, AbstractSpan, Extraction,
    MalformedRecord, TruncationPolicy,
};
