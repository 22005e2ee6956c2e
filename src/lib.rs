//! # PubMed Wordcloud
//!
//! Fetch PubMed records for an advanced query, pull the abstract out of every
//! record in the plain-text dump, and render the combined text as a word cloud.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`parser`]: Locates records in the raw text and extracts their abstracts
//! - [`sources`]: Literature database trait with PubMed and mock implementations
//! - [`render`]: Renderer trait, color maps, masks and the SVG word cloud
//! - [`pipeline`]: Fetch → checkpoint → extract → render → persist settings
//! - [`config`]: Application configuration and persisted run settings
//! - [`ui`]: Terminal output and interactive prompts
//! - [`utils`]: HTTP client and input validation

pub mod config;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::{AppConfig, RunConfig};
pub use parser::{extract_abstracts, locate_anchors, TruncationPolicy};
pub use pipeline::{Pipeline, PipelineError, PipelineSettings, RunReport};
pub use render::{Renderer, WordCloudRenderer};
pub use sources::{LiteratureSource, PubMedSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
