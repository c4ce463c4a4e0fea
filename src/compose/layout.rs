//! Text layout: wrapping, font-size fitting and placement.
//!
//! Every function here is pure apart from the injected random source, and
//! each returns a new value for the next stage.

use crate::compose::font::{TextExtent, TextMeasure};
use crate::config::ComposerConfig;
use crate::error::MemeError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tolerance for float → pixel rounding (0.05 × 500 is not exactly 25 in f32).
const PX_EPSILON: f64 = 1e-4;

/// The two text blocks drawn onto a meme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteText {
    /// Wrapped body inside literal quotation marks.
    pub body: String,
    /// `- {author}`.
    pub author: String,
}

impl QuoteText {
    /// Wrap `body` every `max_words` words and format both blocks.
    pub fn new(body: &str, author: &str, max_words: usize) -> Self {
        Self {
            body: format!("\"{}\"", wrap_words(body, max_words)),
            author: format!("- {author}"),
        }
    }
}

/// Re-join the words of `text`, breaking the line after every `max_words`th
/// word except at the very end.
pub fn wrap_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(max_words.max(1))
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Author point size for a body point size.
pub fn author_size(body_size: u32) -> u32 {
    body_size * 2 / 3
}

/// Pixel bounds inside the padded border, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interior {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Interior {
    /// Interior of a `width` × `height` image with `padding` on every side.
    ///
    /// The near edge rounds up and the far edge rounds down so every pixel
    /// in the interior satisfies the padding on both sides.
    pub fn new(width: u32, height: u32, padding: f32) -> Self {
        let p = f64::from(padding);
        let (w, h) = (f64::from(width), f64::from(height));
        let near = |v: f64| (v - PX_EPSILON).ceil().max(0.0) as u32;
        let far = |v: f64| (v + PX_EPSILON).floor().max(0.0) as u32;
        Self {
            left: near(p * w),
            top: near(p * h),
            right: far((1.0 - p) * w).min(width),
            bottom: far((1.0 - p) * h).min(height),
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

/// Text blocks with the font sizes that make them fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FittedText {
    pub text: QuoteText,
    pub body_size: u32,
    pub author_size: u32,
    pub body: TextExtent,
    pub author: TextExtent,
    pub gap: u32,
}

impl FittedText {
    /// Width of the combined block: the wider of body and author.
    pub fn block_width(&self) -> u32 {
        self.body.width.max(self.author.width)
    }

    /// Height of the combined block: body, gap, author.
    pub fn block_height(&self) -> u32 {
        self.body.height + self.gap + self.author.height
    }
}

/// Shrink the font one point at a time until both blocks fit `interior`.
///
/// # Errors
/// [`MemeError::FontTooSmall`] once the body size would drop below
/// `config.min_font_size`.
pub fn fit(
    measure: &impl TextMeasure,
    text: QuoteText,
    interior: Interior,
    config: &ComposerConfig,
) -> Result<FittedText, MemeError> {
    let mut size = config.font_size;
    loop {
        if size < config.min_font_size || author_size(size) == 0 {
            return Err(MemeError::FontTooSmall {
                min_size: config.min_font_size,
            });
        }

        let fitted = FittedText {
            body: measure.measure(&text.body, size),
            author: measure.measure(&text.author, author_size(size)),
            body_size: size,
            author_size: author_size(size),
            gap: config.gap,
            text: text.clone(),
        };

        if fitted.block_width() <= interior.width() && fitted.block_height() <= interior.height()
        {
            debug!(
                "Fitted at {}pt/{}pt: block {}x{} in interior {}x{}",
                fitted.body_size,
                fitted.author_size,
                fitted.block_width(),
                fitted.block_height(),
                interior.width(),
                interior.height()
            );
            return Ok(fitted);
        }
        size -= 1;
    }
}

/// Top-left corners of the two blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub body: (u32, u32),
    pub author: (u32, u32),
}

/// Pick a uniformly random position for the combined block inside `interior`.
///
/// The author block sits `gap` pixels below the body, left-aligned with it.
/// `fitted` must come from [`fit`] against the same interior.
pub fn place<R: Rng + ?Sized>(fitted: &FittedText, interior: Interior, rng: &mut R) -> Placement {
    let max_x = interior.right.saturating_sub(fitted.block_width()).max(interior.left);
    let max_y = interior.bottom.saturating_sub(fitted.block_height()).max(interior.top);
    let x = rng.random_range(interior.left..=max_x);
    let y = rng.random_range(interior.top..=max_y);
    Placement {
        body: (x, y),
        author: (x, y + fitted.body.height + fitted.gap),
    }
}
