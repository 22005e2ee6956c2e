//! End-to-end run: fetch, checkpoint, extract, render, persist settings.

use std::path::{Path, PathBuf};

use crate::config::{OutputConfig, RunConfig, RunConfigError};
use crate::parser::{extract_abstracts, Extraction, TruncationPolicy};
use crate::render::{Mask, RenderError, RenderOptions, Renderer, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::sources::{LiteratureSource, SourceError};
use crate::utils::{
    validate_color_mapping, validate_identity, validate_mask_path, validate_query, ValidationError,
};

/// Settings that stay fixed across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub output: OutputConfig,
    pub width: u32,
    pub height: u32,
    pub truncation: TruncationPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            truncation: TruncationPolicy::default(),
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Record ids returned by the search
    pub ids_found: usize,
    /// Author-information markers found in the corpus
    pub anchors: usize,
    /// Abstracts handed to the renderer
    pub abstracts: usize,
    /// Malformed records that were skipped
    pub skipped: usize,
    /// Whether a mask constrained the layout
    pub mask_used: bool,
    pub corpus_path: PathBuf,
    pub image_path: PathBuf,
    pub settings_path: PathBuf,
}

/// Errors that abort a run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to fetch records from {source_name}: {error}")]
    Fetch {
        source_name: String,
        #[source]
        error: SourceError,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Settings(#[from] RunConfigError),
}

impl PipelineError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Drives one run against an injected source and renderer.
#[derive(Debug)]
pub struct Pipeline<'a> {
    source: &'a dyn LiteratureSource,
    renderer: &'a dyn Renderer,
    settings: PipelineSettings,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn LiteratureSource,
        renderer: &'a dyn Renderer,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            renderer,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Path the image is written to; the renderer's extension fills in a missing one.
    pub fn image_path(&self) -> PathBuf {
        let mut path = self.settings.output.image_path();
        if path.extension().is_none() {
            path.set_extension(self.renderer.extension());
        }
        path
    }

    /// Execute a full run.
    ///
    /// A fetch failure aborts before anything new is written. An empty
    /// corpus is not an error: it produces an empty word cloud.
    pub async fn run(&self, config: &RunConfig) -> Result<RunReport, PipelineError> {
        validate_identity(&config.identity)?;
        validate_query(&config.query)?;
        let color_map = validate_color_mapping(&config.color_mapping)?;
        let mask = self.resolve_mask(config)?;

        let ids = self
            .source
            .search(&config.query, config.max_results, &config.identity)
            .await
            .map_err(|error| self.fetch_error(error))?;
        tracing::info!(source = self.source.id(), count = ids.len(), "Search finished");

        let corpus = if ids.is_empty() {
            tracing::warn!(query = %config.query, "Search returned no records");
            String::new()
        } else {
            self.source
                .fetch_records(&ids, &config.identity)
                .await
                .map_err(|error| self.fetch_error(error))?
        };

        let output = &self.settings.output;
        std::fs::create_dir_all(&output.directory).map_err(PipelineError::io(&output.directory))?;
        let corpus_path = output.corpus_path();
        std::fs::write(&corpus_path, &corpus).map_err(PipelineError::io(&corpus_path))?;
        tracing::info!(path = %corpus_path.display(), bytes = corpus.len(), "Saved fetched records");

        let extraction = abstracts_from_checkpoint(&corpus_path, self.settings.truncation)?;
        if extraction.anchors == 0 {
            tracing::warn!("No abstracts found in the fetched records");
        }

        let options = RenderOptions {
            background_color: config.background_color.clone(),
            color_map,
            width: self.settings.width,
            height: self.settings.height,
            mask,
        };
        let text = extraction.abstracts.join(" ");
        let image = self.renderer.render(&text, &options)?;

        let image_path = self.image_path();
        std::fs::write(&image_path, image).map_err(PipelineError::io(&image_path))?;
        tracing::info!(path = %image_path.display(), "Saved word cloud");

        let settings_path = output.settings_path();
        config.save(&settings_path)?;

        Ok(RunReport {
            ids_found: ids.len(),
            anchors: extraction.anchors,
            abstracts: extraction.abstracts.len(),
            skipped: extraction.malformed.len(),
            mask_used: options.mask.is_some(),
            corpus_path,
            image_path,
            settings_path,
        })
    }

    /// Load the configured mask, or continue without one if the file is gone.
    fn resolve_mask(&self, config: &RunConfig) -> Result<Option<Mask>, PipelineError> {
        let Some(path) = &config.mask_file else {
            return Ok(None);
        };

        match validate_mask_path(path) {
            Ok(path) => Ok(Some(Mask::open(path)?)),
            Err(err) => {
                tracing::warn!("{}; rendering without a mask", err);
                Ok(None)
            }
        }
    }

    fn fetch_error(&self, error: SourceError) -> PipelineError {
        PipelineError::Fetch {
            source_name: self.source.name().to_string(),
            error,
        }
    }
}

/// Re-read a checkpoint file and extract its abstracts.
pub fn abstracts_from_checkpoint(
    path: &Path,
    policy: TruncationPolicy,
) -> Result<Extraction, PipelineError> {
    let corpus = std::fs::read_to_string(path).map_err(PipelineError::io(path))?;
    Ok(extract_abstracts(&corpus, policy))
}
