//! Per-run settings persisted as JSON.
//!
//! The key names (`email`, `bg_color`, `colormap`, `mask_name`) match the
//! settings files the earlier script-based version of this tool wrote, so
//! those files can still be imported.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::DEFAULT_MAX_RESULTS;

/// Color map used when none is chosen.
pub const DEFAULT_COLOR_MAPPING: &str = "viridis";

fn default_color_mapping() -> String {
    DEFAULT_COLOR_MAPPING.to_string()
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// Parameters governing one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Contact e-mail sent to NCBI
    #[serde(rename = "email")]
    pub identity: String,

    /// PubMed advanced search query
    pub query: String,

    /// Background color; `None` renders a transparent background
    #[serde(rename = "bg_color", default)]
    pub background_color: Option<String>,

    /// Name of the color map used for words
    #[serde(rename = "colormap", default = "default_color_mapping")]
    pub color_mapping: String,

    /// Maximum number of records to fetch
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Image whose white pixels block word placement
    #[serde(rename = "mask_name", default)]
    pub mask_file: Option<PathBuf>,
}

impl RunConfig {
    /// Settings with defaults for everything but the identity and query
    pub fn new(identity: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            query: query.into(),
            background_color: None,
            color_mapping: default_color_mapping(),
            max_results: DEFAULT_MAX_RESULTS,
            mask_file: None,
        }
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, RunConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RunConfigError::Io(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&content)
            .map_err(|e| RunConfigError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), RunConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| RunConfigError::Serialize(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| RunConfigError::Io(format!("{}: {}", path.display(), e)))
    }

    /// One `key : value` line per field, in prompt order
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let or_none = |value: Option<String>| value.unwrap_or_else(|| "None".to_string());
        vec![
            ("email", self.identity.clone()),
            ("query", self.query.clone()),
            ("bg_color", or_none(self.background_color.clone())),
            ("colormap", self.color_mapping.clone()),
            ("max_results", self.max_results.to_string()),
            (
                "mask_name",
                or_none(self.mask_file.as_ref().map(|p| p.display().to_string())),
            ),
        ]
    }
}

/// Settings file errors
#[derive(Debug, thiserror::Error)]
pub enum RunConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordcloud_settings.json");

        let config = RunConfig {
            identity: "a.b@example.com".to_string(),
            query: "crispr[Title] AND 2020:2024[dp]".to_string(),
            background_color: Some("black".to_string()),
            color_mapping: "magma".to_string(),
            max_results: 42,
            mask_file: Some(PathBuf::from("brain.png")),
        };
        config.save(&path).unwrap();

        assert_eq!(RunConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_round_trip_with_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let config = RunConfig::new("x@y.org", "sepsis");
        config.save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw["bg_color"].is_null());
        assert!(raw["mask_name"].is_null());
        assert_eq!(raw["colormap"], "viridis");
        assert_eq!(raw["max_results"], 300);

        assert_eq!(RunConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_legacy_settings() {
        let json = r#"{"email": "me@lab.edu", "query": "malaria", "bg_color": null,
                       "colormap": "plasma", "max_results": 100, "mask_name": null}"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.identity, "me@lab.edu");
        assert_eq!(config.color_mapping, "plasma");
        assert_eq!(config.max_results, 100);
        assert_eq!(config.mask_file, None);
    }

    #[test]
    fn test_missing_optional_keys_use_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{"email": "me@lab.edu", "query": "malaria"}"#).unwrap();
        assert_eq!(config, RunConfig::new("me@lab.edu", "malaria"));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            RunConfig::load(&missing),
            Err(RunConfigError::Io(_))
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{not json").unwrap();
        assert!(matches!(
            RunConfig::load(&broken),
            Err(RunConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_summary_order() {
        let keys: Vec<_> = RunConfig::new("a@b.cd", "q")
            .summary()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec!["email", "query", "bg_color", "colormap", "max_results", "mask_name"]
        );
    }
}
