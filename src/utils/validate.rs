//! Input validation for run settings.
//!
//! Each validator takes the raw text a user typed (or a value read from a
//! settings file) and returns either the accepted value or the reason it was
//! rejected. The interactive prompts re-ask on `Err`; the non-interactive path
//! treats most of these as fatal.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

use crate::render::ColorMap;

/// Default number of records to fetch.
pub const DEFAULT_MAX_RESULTS: usize = 300;

/// Rough `local@domain.tld` shape, matched against the whole input.
static IDENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$")
        .expect("identity pattern is valid")
});

/// Validation error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Email not valid: {0:?}")]
    InvalidIdentityFormat(String),

    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Colormap does not exist: {0:?}")]
    UnsupportedColorMapping(String),

    #[error("Mask file not found: {}", .0.display())]
    MaskFileNotFound(PathBuf),

    #[error("Not a valid number of publications: {0:?}")]
    InvalidMaxResults(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Check that a contact e-mail at least has the right shape.
pub fn validate_identity(identity: &str) -> Result<String, ValidationError> {
    if IDENTITY_RE.is_match(identity) {
        Ok(identity.to_string())
    } else {
        Err(ValidationError::InvalidIdentityFormat(identity.to_string()))
    }
}

/// Accept any non-blank search query.
pub fn validate_query(query: &str) -> Result<String, ValidationError> {
    let query = query.trim();
    if query.is_empty() {
        Err(ValidationError::EmptyQuery)
    } else {
        Ok(query.to_string())
    }
}

/// Resolve a color map name against the supported set.
pub fn validate_color_mapping(name: &str) -> Result<ColorMap, ValidationError> {
    name.parse::<ColorMap>()
        .map_err(|_| ValidationError::UnsupportedColorMapping(name.to_string()))
}

/// Check that a mask image exists on disk.
pub fn validate_mask_path(path: impl AsRef<Path>) -> Result<PathBuf, ValidationError> {
    let path = path.as_ref();
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(ValidationError::MaskFileNotFound(path.to_path_buf()))
    }
}

/// Parse a positive record cap.
pub fn parse_max_results(input: &str) -> Result<usize, ValidationError> {
    match input.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ValidationError::InvalidMaxResults(input.to_string())),
    }
}

/// Validate an API endpoint URL from configuration
///
/// Only HTTP and HTTPS schemes are accepted.
pub fn validate_url(url: &str) -> Result<String, ValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(ValidationError::InvalidUrl("empty URL".to_string()));
    }

    let parsed = url::Url::parse(url).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(ValidationError::InvalidUrl(format!(
            "invalid scheme: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_valid() {
        assert!(validate_identity("a.b@example.com").is_ok());
        assert!(validate_identity("first+tag@sub.domain.org").is_ok());
        assert!(validate_identity("x_y%z@lab-1.co").is_ok());
    }

    #[test]
    fn test_identity_invalid() {
        assert_eq!(
            validate_identity("not-an-email"),
            Err(ValidationError::InvalidIdentityFormat(
                "not-an-email".to_string()
            ))
        );
        assert!(validate_identity("").is_err());
        assert!(validate_identity("a@b").is_err());
        assert!(validate_identity("a@b.c").is_err());
        assert!(validate_identity(" a@example.com").is_err());
        assert!(validate_identity("a@example.com trailing").is_err());
    }

    #[test]
    fn test_query_must_not_be_blank() {
        assert_eq!(validate_query("malaria[MeSH]"), Ok("malaria[MeSH]".to_string()));
        assert_eq!(validate_query(""), Err(ValidationError::EmptyQuery));
        assert_eq!(validate_query("   "), Err(ValidationError::EmptyQuery));
    }

    #[test]
    fn test_error_is_cloneable() {
        let err = ValidationError::MaskFileNotFound(PathBuf::from("mask.png"));
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn test_color_mapping() {
        assert_eq!(validate_color_mapping("viridis"), Ok(ColorMap::Viridis));
        assert_eq!(validate_color_mapping("magma"), Ok(ColorMap::Magma));
        assert!(matches!(
            validate_color_mapping("rainbow-unicorn"),
            Err(ValidationError::UnsupportedColorMapping(_))
        ));
    }

    #[test]
    fn test_mask_path() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("mask.png");
        std::fs::write(&present, b"not really a png").unwrap();

        assert_eq!(validate_mask_path(&present), Ok(present.clone()));
        assert!(matches!(
            validate_mask_path(dir.path().join("missing.png")),
            Err(ValidationError::MaskFileNotFound(_))
        ));
        // A directory is not a mask file.
        assert!(validate_mask_path(dir.path()).is_err());
    }

    #[test]
    fn test_parse_max_results() {
        assert_eq!(parse_max_results("25"), Ok(25));
        assert_eq!(parse_max_results(" 300 "), Ok(300));
        assert!(parse_max_results("0").is_err());
        assert!(parse_max_results("-3").is_err());
        assert!(parse_max_results("many").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi").is_ok());
        assert!(validate_url("http://127.0.0.1:1234/efetch.fcgi").is_ok());
        assert!(validate_url("").is_err());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("not a url").is_err());
    }
}
