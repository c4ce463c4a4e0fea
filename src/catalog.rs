//! Candidate images under a directory.

use crate::error::MemeError;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Every image file below `root`, sorted.
///
/// Hidden directories (`.git`, `.ipynb_checkpoints`, …) are not descended
/// into. A file counts as an image when its extension names a known image
/// format.
pub fn list_images(root: impl AsRef<Path>) -> Result<Vec<PathBuf>, MemeError> {
    let root = root.as_ref();
    let mut images = Vec::new();
    walk(root, &mut images)?;
    images.sort();
    debug!("Found {} images under {}", images.len(), root.display());
    Ok(images)
}

fn walk(dir: &Path, images: &mut Vec<PathBuf>) -> Result<(), MemeError> {
    let entries = std::fs::read_dir(dir).map_err(|e| MemeError::from_io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| MemeError::from_io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| MemeError::from_io(&path, e))?;

        if file_type.is_dir() {
            if !is_hidden(&path) {
                walk(&path, images)?;
            }
        } else if ImageFormat::from_path(&path).is_ok() {
            images.push(path);
        }
    }
    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}
