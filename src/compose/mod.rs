//! Meme composition: image + quote → JPEG.
//!
//! ## Data Flow
//!
//! ```text
//! load ──▶ resize ──▶ wrap ──▶ fit ──▶ place ──▶ draw ──▶ save
//! (file)   (width)    (words)  (font)  (rng)     (white)  (hash name)
//! ```
//!
//! Each stage takes the previous stage's value and returns a new one; the
//! composer itself holds only its configuration and the parsed font, so one
//! composer can serve many threads.
//!
//! 1. [`render::load`] / [`render::resize`]: decode to RGB, scale to the
//!    target width keeping the aspect ratio
//! 2. [`layout::QuoteText::new`]: break the body every N words, wrap it in
//!    quotation marks, prefix the author with `- `
//! 3. [`layout::fit`]: shrink the font one point at a time until both blocks
//!    fit inside the padded interior
//! 4. [`layout::place`]: random top-left corner for the combined block
//! 5. [`render::draw`]: both blocks in white
//! 6. [`hash::save`]: JPEG named `meme_{average hash}.jpg`

pub mod font;
pub mod hash;
pub mod layout;
pub mod render;

use crate::config::ComposerConfig;
use crate::error::MemeError;
use crate::quote::QuoteRecord;
use font::GlyphFont;
use layout::{Interior, QuoteText};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// A meme written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMeme {
    /// `{output_dir}/meme_{hash}.jpg`.
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Body block as drawn, quotation marks and line breaks included.
    pub body_text: String,
    /// Author line as drawn.
    pub author_text: String,
    pub font_size: u32,
    pub author_font_size: u32,
    pub body_origin: (u32, u32),
    pub author_origin: (u32, u32),
}

/// Composites quotes onto images.
#[derive(Debug)]
pub struct MemeComposer {
    config: ComposerConfig,
    font: GlyphFont,
}

impl MemeComposer {
    /// Create a composer, loading the configured font.
    pub fn new(config: ComposerConfig) -> Result<Self, MemeError> {
        let font = GlyphFont::load(&config.font_path)?;
        Ok(Self::with_font(config, font))
    }

    /// Create a composer around an already parsed font.
    pub fn with_font(config: ComposerConfig, font: GlyphFont) -> Self {
        Self { config, font }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Render a meme and return the path of the saved JPEG.
    ///
    /// `width` scales the image first (see [`crate::DEFAULT_WIDTH`]); `None`
    /// keeps the source size.
    pub fn make_meme(
        &self,
        image_path: impl AsRef<Path>,
        body: &str,
        author: &str,
        width: Option<u32>,
    ) -> Result<PathBuf, MemeError> {
        self.compose(image_path, body, author, width)
            .map(|meme| meme.path)
    }

    /// [`MemeComposer::make_meme`] with an explicit random source for placement.
    pub fn make_meme_with_rng<R: Rng + ?Sized>(
        &self,
        image_path: impl AsRef<Path>,
        body: &str,
        author: &str,
        width: Option<u32>,
        rng: &mut R,
    ) -> Result<PathBuf, MemeError> {
        self.compose_with_rng(image_path, body, author, width, rng)
            .map(|meme| meme.path)
    }

    /// Render a meme for a parsed quote.
    pub fn make_quote_meme(
        &self,
        image_path: impl AsRef<Path>,
        quote: &QuoteRecord,
        width: Option<u32>,
    ) -> Result<PathBuf, MemeError> {
        self.make_meme(image_path, quote.body(), quote.author(), width)
    }

    /// Render a meme and describe the result.
    ///
    /// Placement uses a generator seeded from [`ComposerConfig::seed`] when
    /// set, the thread RNG otherwise.
    pub fn compose(
        &self,
        image_path: impl AsRef<Path>,
        body: &str,
        author: &str,
        width: Option<u32>,
    ) -> Result<RenderedMeme, MemeError> {
        match self.config.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                self.compose_with_rng(image_path, body, author, width, &mut rng)
            }
            None => self.compose_with_rng(image_path, body, author, width, &mut rand::rng()),
        }
    }

    /// [`MemeComposer::compose`] with an explicit random source for placement.
    pub fn compose_with_rng<R: Rng + ?Sized>(
        &self,
        image_path: impl AsRef<Path>,
        body: &str,
        author: &str,
        width: Option<u32>,
        rng: &mut R,
    ) -> Result<RenderedMeme, MemeError> {
        let image_path = image_path.as_ref();
        info!("Composing meme on {}", image_path.display());

        let image = render::load(image_path)?;
        let image = render::resize(image, width);
        let (w, h) = image.dimensions();

        let interior = Interior::new(w, h, self.config.padding);
        let text = QuoteText::new(body, author, self.config.max_words_per_line);
        let fitted = layout::fit(&self.font, text, interior, &self.config)?;
        let placement = layout::place(&fitted, interior, rng);

        let image = render::draw(image, &self.font, &fitted, &placement);
        let path = hash::save(&image, &self.config.output_dir)?;

        Ok(RenderedMeme {
            path,
            width: w,
            height: h,
            body_text: fitted.text.body,
            author_text: fitted.text.author,
            font_size: fitted.body_size,
            author_font_size: fitted.author_size,
            body_origin: placement.body,
            author_origin: placement.author,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::font::test_support::system_font;
    use image::{Rgb, RgbImage};

    fn gradient(path: &Path, w: u32, h: u32) {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]))
            .save(path)
            .unwrap();
    }

    fn composer(out: &Path, seed: Option<u64>) -> Option<MemeComposer> {
        let font = system_font()?;
        let mut builder = ComposerConfig::builder().output_dir(out);
        if let Some(seed) = seed {
            builder = builder.seed(seed);
        }
        Some(MemeComposer::with_font(builder.build().unwrap(), font))
    }

    #[test]
    fn missing_font_fails_construction() {
        let config = ComposerConfig::builder()
            .font_path("/nope/LilitaOne-Regular.ttf")
            .build()
            .unwrap();
        assert!(matches!(
            MemeComposer::new(config),
            Err(MemeError::FontLoad { .. })
        ));
    }

    #[test]
    fn composes_resized_meme() {
        let dir = tempfile::tempdir().unwrap();
        let Some(composer) = composer(&dir.path().join("out"), Some(1)) else {
            println!("SKIP: no TrueType font found; set MEME_TEST_FONT");
            return;
        };
        let src = dir.path().join("dog.png");
        gradient(&src, 800, 600);

        let meme = composer
            .compose(
                &src,
                "one two three four five six seven eight",
                "Rex",
                Some(crate::DEFAULT_WIDTH),
            )
            .unwrap();

        assert_eq!((meme.width, meme.height), (500, 375));
        assert_eq!(meme.body_text, "\"one two three four five six\nseven eight\"");
        assert_eq!(meme.author_text, "- Rex");
        assert!(meme.font_size <= 40);
        assert_eq!(meme.author_font_size, meme.font_size * 2 / 3);
        assert!(meme.path.starts_with(dir.path().join("out")));
        let name = meme.path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("meme_") && name.ends_with(".jpg"), "{name}");
        assert_eq!(
            image::open(&meme.path).unwrap().to_rgb8().dimensions(),
            (500, 375)
        );
    }

    #[test]
    fn seeded_composition_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let Some(composer) = composer(&dir.path().join("out"), Some(99)) else {
            println!("SKIP: no TrueType font found; set MEME_TEST_FONT");
            return;
        };
        let src = dir.path().join("dog.png");
        gradient(&src, 640, 480);

        let first = composer.compose(&src, "Woof", "Rex", Some(500)).unwrap();
        let first_bytes = std::fs::read(&first.path).unwrap();
        let second = composer.compose(&src, "Woof", "Rex", Some(500)).unwrap();
        let second_bytes = std::fs::read(&second.path).unwrap();

        assert_eq!(first.path, second.path);
        assert_eq!(first.body_origin, second.body_origin);
        assert_eq!(first_bytes, second_bytes);
    }

    #[test]
    fn quote_record_entry_point() {
        let dir = tempfile::tempdir().unwrap();
        let Some(composer) = composer(&dir.path().join("out"), None) else {
            println!("SKIP: no TrueType font found; set MEME_TEST_FONT");
            return;
        };
        let src = dir.path().join("dog.png");
        gradient(&src, 300, 300);

        let quote = QuoteRecord::new("\"Treat yo self\"", "Fluffles");
        let path = composer.make_quote_meme(&src, &quote, None).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn missing_image_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let Some(composer) = composer(dir.path(), None) else {
            println!("SKIP: no TrueType font found; set MEME_TEST_FONT");
            return;
        };
        let err = composer
            .make_meme(dir.path().join("nope.jpg"), "Woof", "Rex", Some(500))
            .unwrap_err();
        assert!(matches!(err, MemeError::FileNotFound { .. }));
    }
}
