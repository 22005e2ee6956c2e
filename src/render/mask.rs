//! Shape masks.
//!
//! A mask is a 2-D grid the size of the output image. Pure white pixels
//! (red, green and blue all 255) are blocked; words are only placed where every covered pixel is
//! free. A summed-area table keeps rectangle queries constant time.

use std::path::Path;

use super::RenderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    /// Summed-area table of blocked pixels, `(width + 1) * (height + 1)` entries.
    blocked_sums: Vec<u32>,
}

impl Mask {
    /// Load a mask from an image file (PNG, JPEG or BMP).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| RenderError::Mask(format!("{}: {}", path.display(), e)))?
            .to_rgb8();

        let (width, height) = image.dimensions();
        tracing::debug!(path = %path.display(), width, height, "Loaded mask image");

        Self::from_fn(width, height, |x, y| image.get_pixel(x, y).0 == [u8::MAX; 3])
    }

    /// Build a mask from a predicate returning `true` for blocked pixels.
    pub fn from_fn(
        width: u32,
        height: u32,
        blocked: impl Fn(u32, u32) -> bool,
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::Mask("mask has no pixels".to_string()));
        }

        let stride = width as usize + 1;
        let mut sums = vec![0u32; stride * (height as usize + 1)];
        for y in 0..height {
            let mut row = 0u32;
            for x in 0..width {
                row += u32::from(blocked(x, y));
                let idx = (y as usize + 1) * stride + x as usize + 1;
                sums[idx] = sums[idx - stride] + row;
            }
        }

        Ok(Self {
            width,
            height,
            blocked_sums: sums,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of blocked pixels in `[x, x + w) × [y, y + h)`, clipped to the mask.
    pub fn blocked_in(&self, x: u32, y: u32, w: u32, h: u32) -> u32 {
        let x0 = x.min(self.width) as usize;
        let y0 = y.min(self.height) as usize;
        let x1 = x.saturating_add(w).min(self.width) as usize;
        let y1 = y.saturating_add(h).min(self.height) as usize;
        let stride = self.width as usize + 1;
        let at = |x: usize, y: usize| self.blocked_sums[y * stride + x];

        at(x1, y1) + at(x0, y0) - at(x0, y1) - at(x1, y0)
    }

    /// Whether every pixel of the rectangle is free.
    pub fn is_free(&self, x: u32, y: u32, w: u32, h: u32) -> bool {
        self.blocked_in(x, y, w, h) == 0
    }
}
