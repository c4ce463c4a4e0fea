//! Configuration types for ingestion and meme composition.
//!
//! Composition behaviour is controlled through [`ComposerConfig`], ingestion
//! through [`IngestConfig`]. Both are built via builders whose setters clamp
//! values into a usable range and whose `build()` validates what clamping
//! cannot fix.

use crate::error::MemeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default output width in pixels used by [`crate::MemeComposer::make_meme`]
/// callers that do not care about size.
pub const DEFAULT_WIDTH: u32 = 500;

/// Configuration for a [`crate::MemeComposer`].
///
/// # Example
/// ```rust
/// use quote_meme::ComposerConfig;
///
/// let config = ComposerConfig::builder()
///     .output_dir("./tmp")
///     .font_size(48)
///     .max_words_per_line(5)
///     .build()
///     .unwrap();
/// assert_eq!(config.gap, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Directory the rendered memes are written to. Default: `./static`.
    pub output_dir: PathBuf,

    /// TrueType/OpenType font used for both text blocks.
    /// Default: `./fonts/LilitaOne-Regular.ttf`.
    pub font_path: PathBuf,

    /// Initial point size of the quote body. Default: 40.
    ///
    /// This is an upper bound: fitting shrinks it one point at a time until
    /// the quote fits the padded interior of the image. The author line is
    /// always drawn at two thirds of the body size.
    pub font_size: u32,

    /// Smallest body size fitting may reach before giving up. Default: 6.
    pub min_font_size: u32,

    /// Words per line before a forced line break. Default: 6.
    pub max_words_per_line: usize,

    /// Border padding as a fraction of each image dimension. Default: 0.05.
    pub padding: f32,

    /// Vertical gap in pixels between the quote body and the author line. Default: 10.
    pub gap: u32,

    /// Seed for text placement. `None` draws from the thread RNG. Default: None.
    pub seed: Option<u64>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./static"),
            font_path: PathBuf::from("./fonts/LilitaOne-Regular.ttf"),
            font_size: 40,
            min_font_size: 6,
            max_words_per_line: 6,
            padding: 0.05,
            gap: 10,
            seed: None,
        }
    }
}

impl ComposerConfig {
    /// Create a new builder for `ComposerConfig`.
    pub fn builder() -> ComposerConfigBuilder {
        ComposerConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ComposerConfig`].
#[derive(Debug)]
pub struct ComposerConfigBuilder {
    config: ComposerConfig,
}

impl ComposerConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = path.into();
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.config.font_size = size;
        self
    }

    /// The floor is never below 2 so the author line keeps a non-zero size.
    pub fn min_font_size(mut self, size: u32) -> Self {
        self.config.min_font_size = size.max(2);
        self
    }

    pub fn max_words_per_line(mut self, n: usize) -> Self {
        self.config.max_words_per_line = n.max(1);
        self
    }

    pub fn padding(mut self, fraction: f32) -> Self {
        self.config.padding = fraction.clamp(0.0, 0.49);
        self
    }

    pub fn gap(mut self, px: u32) -> Self {
        self.config.gap = px;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ComposerConfig, MemeError> {
        let c = &self.config;
        if c.font_size < c.min_font_size {
            return Err(MemeError::InvalidConfig(format!(
                "font size {} is below the minimum of {}",
                c.font_size, c.min_font_size
            )));
        }
        if !(0.0..0.5).contains(&c.padding) {
            return Err(MemeError::InvalidConfig(format!(
                "padding must be in [0, 0.5), got {}",
                c.padding
            )));
        }
        if c.max_words_per_line == 0 {
            return Err(MemeError::InvalidConfig(
                "max words per line must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Configuration for an [`crate::Ingestor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Extra extraction attempts after a retryable failure. Default: 1.
    ///
    /// Guards against transient failures such as a locked file or a
    /// temporary file the PDF extractor has not flushed yet. Malformed lines
    /// never reach this path; parsers skip them.
    pub max_retries: u32,

    /// Name or path of the PDF text extractor. Default: `pdftotext`.
    pub pdftotext: PathBuf,

    /// Kill the PDF text extractor after this many seconds. Default: 60.
    /// `None` waits forever.
    pub extraction_timeout_secs: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            pdftotext: PathBuf::from("pdftotext"),
            extraction_timeout_secs: Some(60),
        }
    }
}

impl IngestConfig {
    /// Create a new builder for `IngestConfig`.
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`IngestConfig`].
#[derive(Debug)]
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn pdftotext(mut self, bin: impl Into<PathBuf>) -> Self {
        self.config.pdftotext = bin.into();
        self
    }

    pub fn extraction_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.extraction_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<IngestConfig, MemeError> {
        if self.config.pdftotext.as_os_str().is_empty() {
            return Err(MemeError::InvalidConfig(
                "pdftotext binary must not be empty".into(),
            ));
        }
        if self.config.extraction_timeout_secs == Some(0) {
            return Err(MemeError::InvalidConfig(
                "extraction timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composer_defaults() {
        let c = ComposerConfig::default();
        assert_eq!(c.font_size, 40);
        assert_eq!(c.max_words_per_line, 6);
        assert!((c.padding - 0.05).abs() < f32::EPSILON);
        assert_eq!(c.gap, 10);
        assert_eq!(c.output_dir, PathBuf::from("./static"));
    }

    #[test]
    fn builder_clamps() {
        let c = ComposerConfig::builder()
            .max_words_per_line(0)
            .padding(0.9)
            .min_font_size(0)
            .build()
            .unwrap();
        assert_eq!(c.max_words_per_line, 1);
        assert!(c.padding < 0.5);
        assert_eq!(c.min_font_size, 2);
    }

    #[test]
    fn font_size_below_floor_is_rejected() {
        let err = ComposerConfig::builder()
            .font_size(4)
            .min_font_size(6)
            .build()
            .unwrap_err();
        assert!(matches!(err, MemeError::InvalidConfig(_)));
    }

    #[test]
    fn ingest_defaults() {
        let c = IngestConfig::default();
        assert_eq!(c.max_retries, 1);
        assert_eq!(c.pdftotext, PathBuf::from("pdftotext"));
        assert_eq!(c.extraction_timeout_secs, Some(60));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(IngestConfig::builder()
            .extraction_timeout_secs(Some(0))
            .build()
            .is_err());
        assert!(IngestConfig::builder()
            .extraction_timeout_secs(None)
            .build()
            .is_ok());
    }
}
