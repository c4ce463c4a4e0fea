//! Pixel stages: load, resize and draw.

use crate::compose::font::GlyphFont;
use crate::compose::layout::{FittedText, Placement};
use crate::error::MemeError;
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::path::Path;
use tracing::debug;

const TEXT_COLOUR: Rgb<u8> = Rgb([255, 255, 255]);

/// Decode an image file into RGB pixels.
pub fn load(path: &Path) -> Result<RgbImage, MemeError> {
    let image = image::open(path).map_err(|source| match source {
        image::ImageError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
            MemeError::FileNotFound {
                path: path.to_path_buf(),
            }
        }
        source => MemeError::Image {
            path: path.to_path_buf(),
            source,
        },
    })?;
    debug!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image.to_rgb8())
}

/// Scale to `width`, keeping the aspect ratio. `None` leaves the image as is.
///
/// The new height is truncated to whole pixels and never drops below one.
pub fn resize(image: RgbImage, width: Option<u32>) -> RgbImage {
    let Some(width) = width.filter(|w| *w > 0) else {
        return image;
    };
    let (w, h) = image.dimensions();
    if w == width {
        return image;
    }
    let height = ((u64::from(h) * u64::from(width)) / u64::from(w.max(1))).max(1) as u32;
    debug!("Resizing {}x{} → {}x{}", w, h, width, height);
    image::imageops::resize(&image, width, height, FilterType::Lanczos3)
}

/// Draw both text blocks in white and return the new image.
pub fn draw(
    mut image: RgbImage,
    font: &GlyphFont,
    fitted: &FittedText,
    placement: &Placement,
) -> RgbImage {
    draw_block(
        &mut image,
        font,
        &fitted.text.body,
        fitted.body_size,
        placement.body,
    );
    draw_block(
        &mut image,
        font,
        &fitted.text.author,
        fitted.author_size,
        placement.author,
    );
    image
}

fn draw_block(image: &mut RgbImage, font: &GlyphFont, text: &str, size: u32, origin: (u32, u32)) {
    let scale = font.scale(size);
    let advance = font.line_advance(size);
    for (i, line) in text.split('\n').enumerate() {
        let y = origin.1 as f32 + i as f32 * advance;
        draw_text_mut(
            image,
            TEXT_COLOUR,
            origin.0 as i32,
            y.round() as i32,
            scale,
            font.font(),
            line,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::font::test_support::system_font;
    use crate::compose::layout::QuoteText;
    use crate::compose::font::TextMeasure;

    #[test]
    fn resize_keeps_aspect_ratio() {
        let img = RgbImage::new(1000, 750);
        let out = resize(img, Some(500));
        assert_eq!(out.dimensions(), (500, 375));
    }

    #[test]
    fn resize_truncates_height() {
        let img = RgbImage::new(3, 2);
        assert_eq!(resize(img, Some(500)).dimensions(), (500, 333));
    }

    #[test]
    fn resize_none_is_identity() {
        let img = RgbImage::new(640, 480);
        assert_eq!(resize(img, None).dimensions(), (640, 480));
    }

    #[test]
    fn load_missing_file() {
        let err = load(Path::new("/nope/dog.jpg")).unwrap_err();
        assert!(matches!(err, MemeError::FileNotFound { .. }));
    }

    #[test]
    fn load_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dog.png");
        std::fs::write(&path, "not a png").unwrap();
        assert!(matches!(load(&path), Err(MemeError::Image { .. })));
    }

    #[test]
    fn draw_paints_white_inside_the_blocks_only() {
        let Some(font) = system_font() else {
            println!("SKIP: no TrueType font found; set MEME_TEST_FONT");
            return;
        };
        let text = QuoteText::new("Woof", "Rex", 6);
        let fitted = FittedText {
            body: font.measure(&text.body, 30),
            author: font.measure(&text.author, 20),
            body_size: 30,
            author_size: 20,
            gap: 10,
            text,
        };
        let placement = Placement {
            body: (20, 20),
            author: (20, 20 + fitted.body.height + 10),
        };
        let out = draw(RgbImage::new(200, 200), &font, &fitted, &placement);

        let lit: Vec<(u32, u32)> = out
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] > 0)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!lit.is_empty(), "nothing was drawn");
        let bottom = placement.author.1 + fitted.author.height;
        assert!(lit.iter().all(|&(x, y)| x >= 18 && y >= 18 && y <= bottom + 2));
    }
}
