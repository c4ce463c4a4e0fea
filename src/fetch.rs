//! Remote images: download by URL, or fall back to a placeholder.
//!
//! The web form accepts an arbitrary image URL. A missing or non-HTTP scheme,
//! a connection failure, a timeout and a non-success status all substitute
//! the placeholder image instead of failing the request. A downloaded image
//! lives in a randomly named temporary file that is removed when the
//! [`FetchedImage`] is dropped.

use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// An image ready for the composer.
#[derive(Debug)]
pub enum FetchedImage {
    /// Downloaded bytes, kept alive until the value is dropped.
    Downloaded { path: PathBuf, _file: NamedTempFile },
    /// The fetch failed; use the placeholder.
    Placeholder(PathBuf),
}

impl FetchedImage {
    /// Path to the image file regardless of how it was obtained.
    pub fn path(&self) -> &Path {
        match self {
            FetchedImage::Downloaded { path, .. } => path,
            FetchedImage::Placeholder(p) => p,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, FetchedImage::Placeholder(_))
    }
}

/// Check if the input string looks like a fetchable URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Download `url` into `dest_dir`, or return `placeholder` on any failure.
pub async fn fetch_image(
    url: &str,
    dest_dir: &Path,
    placeholder: &Path,
    timeout_secs: u64,
) -> FetchedImage {
    if !is_url(url) {
        warn!("Missing URL or URL schema: {:?}", url);
        return FetchedImage::Placeholder(placeholder.to_path_buf());
    }

    match download(url, dest_dir, timeout_secs).await {
        Ok(file) => {
            let path = file.path().to_path_buf();
            info!("Downloaded {} to {}", url, path.display());
            FetchedImage::Downloaded { path, _file: file }
        }
        Err(reason) => {
            warn!("Invalid URL or connection issue for {}: {}", url, reason);
            FetchedImage::Placeholder(placeholder.to_path_buf())
        }
    }
}

async fn download(url: &str, dest_dir: &Path, timeout_secs: u64) -> Result<NamedTempFile, String> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| e.to_string())?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            format!("timed out after {timeout_secs}s")
        } else {
            e.to_string()
        }
    })?;

    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }

    let bytes = response.bytes().await.map_err(|e| e.to_string())?;

    tokio::fs::create_dir_all(dest_dir)
        .await
        .map_err(|e| format!("cannot create {}: {e}", dest_dir.display()))?;
    let file = tempfile::Builder::new()
        .prefix("fetched-")
        .suffix(&format!(".{}", extension_for(url)))
        .tempfile_in(dest_dir)
        .map_err(|e| format!("cannot create temp file: {e}"))?;
    tokio::fs::write(file.path(), &bytes)
        .await
        .map_err(|e| format!("cannot write temp file: {e}"))?;

    Ok(file)
}

/// Extension of the URL's last path segment, `png` when there is none.
fn extension_for(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut s| s.next_back().map(str::to_string))
        })
        .and_then(|last| {
            Path::new(&last)
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
        })
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "png".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/dog.jpg"));
        assert!(is_url("http://example.com/dog.jpg"));
        assert!(!is_url("example.com/dog.jpg"));
        assert!(!is_url("ftp://example.com/dog.jpg"));
        assert!(!is_url(""));
    }

    #[test]
    fn extension_from_url() {
        assert_eq!(extension_for("https://x.org/a/dog.JPG"), "jpg");
        assert_eq!(extension_for("https://x.org/a/dog.webp?size=2"), "webp");
        assert_eq!(extension_for("https://x.org/a/"), "png");
        assert_eq!(extension_for("https://x.org/image"), "png");
    }

    #[tokio::test]
    async fn missing_schema_uses_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let placeholder = dir.path().join("placeholder.png");
        let fetched = fetch_image("example.com/dog.jpg", dir.path(), &placeholder, 5).await;
        assert!(fetched.is_placeholder());
        assert_eq!(fetched.path(), placeholder.as_path());
    }

    #[tokio::test]
    async fn connection_failure_uses_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let placeholder = dir.path().join("placeholder.png");
        // Port 9 (discard) on loopback is closed on any sane test machine.
        let fetched = fetch_image("http://127.0.0.1:9/dog.jpg", dir.path(), &placeholder, 5).await;
        assert!(fetched.is_placeholder());
    }
}
