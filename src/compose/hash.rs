//! Perceptual hashing and content-addressed saving.
//!
//! The output name is the 64-bit average hash of the final pixels: shrink to
//! 8×8 grayscale, then one bit per pixel, set when the pixel is brighter than
//! the mean. Bits are packed row-major, first pixel in the most significant
//! bit, and printed as 16 hex digits. Pixel-identical memes share a name, so
//! saving the same meme twice overwrites one file.

use crate::error::MemeError;
use image::imageops::FilterType;
use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};
use tracing::info;

const HASH_SIDE: u32 = 8;

/// Average hash of `image`.
pub fn average_hash(image: &RgbImage) -> u64 {
    let gray = image::imageops::grayscale(image);
    let small = image::imageops::resize(&gray, HASH_SIDE, HASH_SIDE, FilterType::Lanczos3);

    let total: u32 = small.pixels().map(|p| u32::from(p.0[0])).sum();
    let mean = f64::from(total) / f64::from(HASH_SIDE * HASH_SIDE);

    small
        .pixels()
        .fold(0u64, |hash, p| (hash << 1) | u64::from(f64::from(p.0[0]) > mean))
}

/// File name for a meme with the given hash.
pub fn meme_file_name(hash: u64) -> String {
    format!("meme_{hash:016x}.jpg")
}

/// Save `image` as JPEG under `dir`, named by its average hash.
pub fn save(image: &RgbImage, dir: &Path) -> Result<PathBuf, MemeError> {
    std::fs::create_dir_all(dir).map_err(|source| MemeError::OutputWriteFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(meme_file_name(average_hash(image)));
    image
        .save_with_format(&path, ImageFormat::Jpeg)
        .map_err(|source| match source {
            image::ImageError::IoError(source) => MemeError::OutputWriteFailed {
                path: path.clone(),
                source,
            },
            source => MemeError::Image {
                path: path.clone(),
                source,
            },
        })?;

    info!("Saved meme: {}", path.display());
    Ok(path)
}
