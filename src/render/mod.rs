//! Word-frequency rendering.
//!
//! The pipeline hands the joined abstract text to a [`Renderer`] together with
//! [`RenderOptions`] and writes whatever bytes come back to the image file.
//! [`WordCloudRenderer`] is the shipped implementation and produces an SVG
//! word cloud; tests substitute their own renderer.

mod colormap;
mod mask;
mod svg;

pub use colormap::{ColorMap, Rgb, UnknownColorMap};
pub use mask::Mask;
pub use svg::{word_frequencies, WordCloudRenderer, STOPWORDS};

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 400;

/// Style options for one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// CSS color for the background; `None` leaves it transparent.
    pub background_color: Option<String>,
    pub color_map: ColorMap,
    pub width: u32,
    pub height: u32,
    /// When set, the mask's dimensions replace `width` and `height`.
    pub mask: Option<Mask>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background_color: None,
            color_map: ColorMap::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mask: None,
        }
    }
}

impl RenderOptions {
    /// Canvas size after taking the mask into account.
    pub fn canvas_size(&self) -> (u32, u32) {
        match &self.mask {
            Some(mask) => (mask.width(), mask.height()),
            None => (self.width, self.height),
        }
    }
}

/// Something that turns text into an image.
pub trait Renderer: Send + Sync + std::fmt::Debug {
    /// File extension of the produced image, without the dot
    fn extension(&self) -> &str;

    /// Render `corpus` and return the encoded image
    fn render(&self, corpus: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError>;
}

/// Errors raised while rendering
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The mask image could not be loaded or is unusable
    #[error("Mask error: {0}")]
    Mask(String),

    /// Canvas dimensions are unusable
    #[error("Invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Render error: {0}")]
    Other(String),
}
