//! PDF quotes via poppler's `pdftotext`.
//!
//! The extractor writes into a randomly named temporary file so concurrent
//! ingestions never share a path. The file is a [`tempfile::NamedTempFile`]
//! and is removed when it goes out of scope, on error paths included. The
//! text is then read line by line with the plain-text rule.

use crate::config::IngestConfig;
use crate::error::MemeError;
use crate::ingest::text::quotes_from_lines;
use crate::quote::QuoteRecord;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Convert `path` to text with the configured extractor and parse the lines.
pub fn extract(path: &Path, config: &IngestConfig) -> Result<Vec<QuoteRecord>, MemeError> {
    if !path.exists() {
        return Err(MemeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let pdf_err = |detail: String| MemeError::PdfExtraction {
        path: path.to_path_buf(),
        detail,
    };

    let tmp = tempfile::Builder::new()
        .prefix("quotes-")
        .suffix(".txt")
        .tempfile()
        .map_err(|e| pdf_err(format!("cannot create temp file: {e}")))?;

    info!(
        "Running {} on {}",
        config.pdftotext.display(),
        path.display()
    );

    let child = Command::new(&config.pdftotext)
        .arg(path.as_os_str())
        .arg(tmp.path().as_os_str())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                pdf_err(format!(
                    "{} not found. Install with: apt install poppler-utils (Linux) or brew install poppler (macOS)",
                    config.pdftotext.display()
                ))
            } else {
                pdf_err(format!("failed to start {}: {e}", config.pdftotext.display()))
            }
        })?;

    let (status, stderr) = wait_with_timeout(child, config.extraction_timeout_secs)
        .map_err(|e| pdf_err(format!("waiting for extractor: {e}")))?
        .ok_or_else(|| MemeError::ExtractionTimeout {
            path: path.to_path_buf(),
            secs: config.extraction_timeout_secs.unwrap_or_default(),
        })?;

    if !status.success() {
        return Err(pdf_err(format!("{status}: {}", stderr.trim())));
    }

    let text = std::fs::read_to_string(tmp.path())
        .map_err(|e| pdf_err(format!("cannot read extracted text: {e}")))?;
    let quotes = quotes_from_lines(&text);
    debug!("{}: {} quotes from extracted text", path.display(), quotes.len());
    Ok(quotes)
}

/// Wait for `child`, killing it once `timeout_secs` have passed.
///
/// Stderr is drained on its own thread while waiting so a chatty extractor
/// cannot block on a full pipe. Returns `Ok(None)` on timeout, otherwise the
/// exit status and captured stderr.
fn wait_with_timeout(
    mut child: Child,
    timeout_secs: Option<u64>,
) -> std::io::Result<Option<(ExitStatus, String)>> {
    let deadline = timeout_secs.map(|s| Instant::now() + Duration::from_secs(s));
    let drain = child.stderr.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf).ok();
            String::from_utf8_lossy(&buf).into_owned()
        })
    });
    loop {
        if let Some(status) = child.try_wait()? {
            let stderr = drain
                .and_then(|handle| handle.join().ok())
                .unwrap_or_default();
            return Ok(Some((status, stderr)));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            child.kill().ok();
            child.wait()?;
            // A grandchild may still hold the pipe; leave the reader detached.
            drop(drain);
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
