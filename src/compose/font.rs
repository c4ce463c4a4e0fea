//! Text measurement and the TrueType font used to draw memes.
//!
//! Layout only needs the pixel extent of a block of text at a given point
//! size, so it talks to [`TextMeasure`] rather than to a font directly. That
//! keeps fitting and placement testable without a font file.

use crate::error::MemeError;
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Pixel size of a rendered text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

/// Measures multi-line text.
pub trait TextMeasure {
    /// Extent of `text` at `size` points. Lines are separated by `\n`; the
    /// width is that of the widest line.
    fn measure(&self, text: &str, size: u32) -> TextExtent;
}

/// A parsed TrueType/OpenType font.
pub struct GlyphFont {
    font: FontVec,
    path: PathBuf,
}

impl std::fmt::Debug for GlyphFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphFont").field("path", &self.path).finish()
    }
}

impl GlyphFont {
    /// Load and parse a font file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MemeError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| MemeError::FontLoad {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let font = Self::from_bytes(bytes, path)?;
        debug!("Loaded font {}", path.display());
        Ok(font)
    }

    /// Parse font bytes. `origin` is only used in error messages.
    pub fn from_bytes(bytes: Vec<u8>, origin: impl Into<PathBuf>) -> Result<Self, MemeError> {
        let path = origin.into();
        let font = FontVec::try_from_vec(bytes).map_err(|e| MemeError::FontLoad {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        Ok(Self { font, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn font(&self) -> &FontVec {
        &self.font
    }

    /// Pixel scale for a point size, treating the size as pixels per em.
    pub fn scale(&self, size: u32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(size as f32 * self.font.height_unscaled() / units_per_em)
    }

    /// Vertical distance between the tops of two consecutive lines.
    pub fn line_advance(&self, size: u32) -> f32 {
        let scaled = self.font.as_scaled(self.scale(size));
        scaled.height() + scaled.line_gap()
    }

    fn line_width(&self, line: &str, scale: PxScale) -> f32 {
        let scaled = self.font.as_scaled(scale);
        let mut width = 0.0;
        let mut previous = None;
        for c in line.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }
}

impl TextMeasure for GlyphFont {
    fn measure(&self, text: &str, size: u32) -> TextExtent {
        let scale = self.scale(size);
        let scaled = self.font.as_scaled(scale);
        let lines: Vec<&str> = text.split('\n').collect();

        let width = lines
            .iter()
            .map(|line| self.line_width(line, scale))
            .fold(0.0f32, f32::max);
        let height = lines.len() as f32 * scaled.height()
            + lines.len().saturating_sub(1) as f32 * scaled.line_gap();

        TextExtent {
            width: width.ceil() as u32,
            height: height.ceil() as u32,
        }
    }
}
