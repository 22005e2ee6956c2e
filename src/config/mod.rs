//! Configuration management.
//!
//! Two kinds of configuration exist:
//!
//! - [`AppConfig`]: how the tool talks to NCBI, where it writes files and how
//!   large the image is. Read from an optional TOML file and overridden by
//!   `PUBMED_WORDCLOUD_*` environment variables.
//! - [`RunConfig`]: what one run searches for and how it looks. Collected
//!   interactively or read from the JSON settings file a previous run wrote.
//!
//! # Configuration File Format
//!
//! ```toml
//! [ncbi]
//! esearch_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi"
//! efetch_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi"
//! tool = "pubmed-wordcloud"
//! api_key = "your-ncbi-key"
//!
//! [output]
//! directory = "."
//! corpus_file = "papers.txt"
//! image_file = "wordcloud.svg"
//! settings_file = "wordcloud_settings.json"
//!
//! [render]
//! width = 800
//! height = 400
//! max_words = 200
//! min_font_size = 4.0
//!
//! [http]
//! timeout_secs = 60
//! ```
//!
//! Environment overrides use `__` between section and key, e.g.
//! `PUBMED_WORDCLOUD_NCBI__API_KEY` or `PUBMED_WORDCLOUD_RENDER__WIDTH`.

mod run_config;

pub use run_config::{RunConfig, RunConfigError, DEFAULT_COLOR_MAPPING};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::render::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::sources::{PubMedEndpoints, PUBMED_EFETCH_URL, PUBMED_ESEARCH_URL};
use crate::utils::{validate_url, DEFAULT_TIMEOUT_SECS};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PUBMED_WORDCLOUD";

/// Fallback environment variable for the NCBI API key.
pub const NCBI_API_KEY_ENV: &str = "NCBI_API_KEY";

/// Placeholder printed instead of a configured secret.
const REDACTED: &str = "<set>";

/// Config file name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "pubmed-wordcloud.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ncbi: NcbiConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

/// NCBI E-utilities settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NcbiConfig {
    pub esearch_url: String,
    pub efetch_url: String,
    /// Tool name reported to NCBI
    pub tool: String,
    /// NCBI API key (optional, raises the request allowance)
    pub api_key: Option<String>,
}

impl Default for NcbiConfig {
    fn default() -> Self {
        Self {
            esearch_url: PUBMED_ESEARCH_URL.to_string(),
            efetch_url: PUBMED_EFETCH_URL.to_string(),
            tool: env!("CARGO_PKG_NAME").to_string(),
            api_key: None,
        }
    }
}

impl NcbiConfig {
    pub fn endpoints(&self) -> PubMedEndpoints {
        PubMedEndpoints {
            esearch_url: self.esearch_url.clone(),
            efetch_url: self.efetch_url.clone(),
            tool: self.tool.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

/// Output file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory all output files are written to
    pub directory: PathBuf,
    /// Raw corpus checkpoint
    pub corpus_file: String,
    /// Rendered word cloud
    pub image_file: String,
    /// Persisted run settings
    pub settings_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            corpus_file: "papers.txt".to_string(),
            image_file: "wordcloud.svg".to_string(),
            settings_file: "wordcloud_settings.json".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn corpus_path(&self) -> PathBuf {
        self.directory.join(&self.corpus_file)
    }

    pub fn image_path(&self) -> PathBuf {
        self.directory.join(&self.image_file)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.directory.join(&self.settings_file)
    }
}

/// Word cloud dimensions and density
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
    pub min_font_size: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_words: 200,
            min_font_size: 4.0,
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Check values that would only fail later, mid-run
    pub fn validate(&self) -> Result<(), AppConfigError> {
        validate_url(&self.ncbi.esearch_url)
            .map_err(|e| AppConfigError::Invalid(format!("ncbi.esearch_url: {}", e)))?;
        validate_url(&self.ncbi.efetch_url)
            .map_err(|e| AppConfigError::Invalid(format!("ncbi.efetch_url: {}", e)))?;

        if self.render.width == 0 || self.render.height == 0 {
            return Err(AppConfigError::Invalid(
                "render.width and render.height must be positive".to_string(),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppConfigError::Invalid(
                "http.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Copy of the configuration with secrets masked, for display
    pub fn redacted(&self) -> AppConfig {
        let mut config = self.clone();
        if config.ncbi.api_key.is_some() {
            config.ncbi.api_key = Some(REDACTED.to_string());
        }
        config
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, AppConfigError> {
        toml::to_string_pretty(self).map_err(|e| AppConfigError::Serialize(e.to_string()))
    }
}

/// Load configuration from an optional file plus environment overrides
///
/// `PUBMED_WORDCLOUD_*` variables win over the file. When neither sets
/// `ncbi.api_key`, `NCBI_API_KEY` is used.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, AppConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;
    if config.ncbi.api_key.is_none() {
        config.ncbi.api_key = std::env::var(NCBI_API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty());
    }
    config.validate()?;
    Ok(config)
}

/// Find a configuration file in the working directory or the platform config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("config.toml"))
        .filter(|path| path.is_file())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum AppConfigError {
    #[error("Config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    // Environment variables are process-wide; tests that load config take this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.render.width, 800);
        assert_eq!(config.render.height, 400);
        assert_eq!(config.output.corpus_path(), PathBuf::from("./papers.txt"));
        assert_eq!(config.ncbi.esearch_url, PUBMED_ESEARCH_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_file() {
        let _guard = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[ncbi]
tool = "lab-cloud"

[output]
directory = "/tmp/clouds"
image_file = "cloud.svg"

[render]
width = 1024
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.ncbi.tool, "lab-cloud");
        assert_eq!(config.ncbi.efetch_url, PUBMED_EFETCH_URL);
        assert_eq!(config.output.image_path(), PathBuf::from("/tmp/clouds/cloud.svg"));
        assert_eq!(config.output.corpus_file, "papers.txt");
        assert_eq!(config.render.width, 1024);
        assert_eq!(config.render.height, 400);
    }

    #[test]
    fn test_load_config_rejects_bad_endpoint() {
        let _guard = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ncbi]\nesearch_url = \"ftp://example.com\"\n").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(AppConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_config_missing_file() {
        let _guard = env_lock();
        let path = PathBuf::from("/nonexistent/pubmed-wordcloud.toml");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_to_toml_round_trip() {
        let mut config = AppConfig::default();
        config.render.max_words = 50;
        let text = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.render.max_words, 50);
        assert_eq!(parsed.output, config.output);
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[render]\nwidth = 1024\nheight = 300\n").unwrap();

        std::env::set_var("PUBMED_WORDCLOUD_RENDER__WIDTH", "1234");
        std::env::set_var("PUBMED_WORDCLOUD_NCBI__API_KEY", "from-env");
        let result = load_config(Some(&path));
        std::env::remove_var("PUBMED_WORDCLOUD_RENDER__WIDTH");
        std::env::remove_var("PUBMED_WORDCLOUD_NCBI__API_KEY");

        let config = result.unwrap();
        assert_eq!(config.render.width, 1234);
        assert_eq!(config.render.height, 300);
        assert_eq!(config.ncbi.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_ncbi_api_key_fallback() {
        let _guard = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ncbi]\ntool = \"lab-cloud\"\n").unwrap();

        std::env::set_var(NCBI_API_KEY_ENV, "fallback-key");
        let from_env = load_config(Some(&path));
        std::fs::write(&path, "[ncbi]\napi_key = \"file-key\"\n").unwrap();
        let from_file = load_config(Some(&path));
        std::env::remove_var(NCBI_API_KEY_ENV);

        assert_eq!(from_env.unwrap().ncbi.api_key.as_deref(), Some("fallback-key"));
        assert_eq!(from_file.unwrap().ncbi.api_key.as_deref(), Some("file-key"));
        assert_eq!(AppConfig::default().ncbi.api_key, None);
    }

    #[test]
    fn test_redacted_hides_api_key() {
        let mut config = AppConfig::default();
        config.ncbi.api_key = Some("super-secret".to_string());

        let shown = config.redacted().to_toml().unwrap();
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("api_key = \"<set>\""));
        assert_eq!(config.ncbi.api_key.as_deref(), Some("super-secret"));

        // Nothing to hide when no key is set
        assert_eq!(AppConfig::default().redacted(), AppConfig::default());
    }
}
