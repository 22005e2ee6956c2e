//! Utility modules shared by the pipeline and the CLI.
//!
//! - [`HttpClient`]: shared reqwest client with timeouts and a user agent
//! - [`validate_identity`], [`validate_query`], [`validate_color_mapping`], [`validate_mask_path`],
//!   [`parse_max_results`]: validators behind the interactive prompts
//! - [`validate_url`]: endpoint check for configuration values

mod http;
mod validate;

pub use http::{HttpClient, DEFAULT_TIMEOUT_SECS};
pub use validate::{
    parse_max_results, validate_color_mapping, validate_identity, validate_mask_path,
    validate_query, validate_url, ValidationError, DEFAULT_MAX_RESULTS,
};
