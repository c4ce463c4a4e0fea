//! Multi-format quote ingestion.
//!
//! Every supported document format is one variant of [`FormatKind`]. A variant
//! knows its file extensions and how to extract [`QuoteRecord`]s from a file of
//! its format; the [`Ingestor`] picks the first variant in
//! [`FormatKind::REGISTRY`] that recognises a path and hands it the file.
//!
//! ## Formats
//!
//! ```text
//! .txt   ──▶ text     one quote per line, `body - author`
//! .docx  ──▶ docx     one quote per paragraph, same pattern
//! .pdf   ──▶ pdf      pdftotext → temp file → text rule
//! .csv   ──▶ tabular  header row with `body` and `author` columns
//! ```
//!
//! The three free-text formats share the single-hyphen rule in
//! [`text::split_quote_line`]: lines with zero or several hyphens are skipped
//! rather than guessed at.
//!
//! ## Retry
//!
//! Extraction runs under a [`RetryPolicy`]. A retryable failure
//! ([`MemeError::is_retryable`]) is logged and the extraction repeated with
//! identical arguments, once by default. This protects against transient
//! failures only: a genuinely broken file fails the same way twice and the
//! second error reaches the caller.

pub mod docx;
pub mod pdf;
pub mod tabular;
pub mod text;

use crate::config::IngestConfig;
use crate::error::MemeError;
use crate::quote::QuoteRecord;
use std::path::Path;
use tracing::{debug, info, warn};

/// A supported quote document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// UTF-8 text, one quote per line.
    PlainText,
    /// Office Open XML word-processor document.
    WordDocument,
    /// PDF, converted to text with an external extractor.
    Pdf,
    /// CSV with `body` and `author` columns.
    Tabular,
}

impl FormatKind {
    /// Dispatch order. First match wins if two formats ever share an extension.
    pub const REGISTRY: [FormatKind; 4] = [
        FormatKind::PlainText,
        FormatKind::WordDocument,
        FormatKind::Pdf,
        FormatKind::Tabular,
    ];

    /// File extensions handled by this format, leading dot included.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FormatKind::PlainText => &[".txt"],
            FormatKind::WordDocument => &[".docx"],
            FormatKind::Pdf => &[".pdf"],
            FormatKind::Tabular => &[".csv"],
        }
    }

    /// Whether `path` carries one of this format's extensions.
    ///
    /// Case-sensitive: `QUOTES.TXT` is not a plain-text file.
    pub fn recognizes(self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let suffix = format!(".{ext}");
                self.extensions().contains(&suffix.as_str())
            }
            None => false,
        }
    }

    /// The first registered format recognising `path`.
    pub fn detect(path: &Path) -> Option<FormatKind> {
        Self::REGISTRY.into_iter().find(|kind| kind.recognizes(path))
    }

    /// Extract every well-formed quote from `path`. No retry.
    pub fn extract(
        self,
        path: &Path,
        config: &IngestConfig,
    ) -> Result<Vec<QuoteRecord>, MemeError> {
        match self {
            FormatKind::PlainText => text::extract(path),
            FormatKind::WordDocument => docx::extract(path),
            FormatKind::Pdf => pdf::extract(path, config),
            FormatKind::Tabular => tabular::extract(path),
        }
    }
}

/// Bounded retry for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// retries are used up. Each retried failure is logged once.
    pub fn run<T>(
        &self,
        what: &Path,
        mut op: impl FnMut() -> Result<T, MemeError>,
    ) -> Result<T, MemeError> {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "Something went wrong ingesting {}: {}; retry {}/{}",
                        what.display(),
                        e,
                        attempt,
                        self.max_retries
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Picks a parser per file and extracts its quotes.
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Parse one file into quotes.
    ///
    /// # Errors
    /// [`MemeError::UnsupportedFormat`] when no registered format recognises
    /// the path; otherwise the extraction error left after the retry.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Vec<QuoteRecord>, MemeError> {
        let path = path.as_ref();
        let kind = FormatKind::detect(path).ok_or_else(|| MemeError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        debug!("Ingesting {} as {:?}", path.display(), kind);

        let policy = RetryPolicy::new(self.config.max_retries);
        let quotes = policy.run(path, || kind.extract(path, &self.config))?;
        info!("Ingested {} quotes from {}", quotes.len(), path.display());
        Ok(quotes)
    }

    /// Parse several files and concatenate their quotes in input order.
    ///
    /// The first failing file aborts the whole call. Callers wanting
    /// per-file isolation call [`Ingestor::parse`] themselves.
    pub fn parse_all<P: AsRef<Path>>(
        &self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Vec<QuoteRecord>, MemeError> {
        let mut quotes = Vec::new();
        for path in paths {
            quotes.extend(self.parse(path)?);
        }
        Ok(quotes)
    }
}

/// Parse one file with the default [`IngestConfig`].
pub fn parse(path: impl AsRef<Path>) -> Result<Vec<QuoteRecord>, MemeError> {
    Ingestor::default().parse(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::PathBuf;

    #[test]
    fn recognizes_own_extensions_only() {
        let cases = [
            ("quotes.txt", FormatKind::PlainText),
            ("quotes.docx", FormatKind::WordDocument),
            ("quotes.pdf", FormatKind::Pdf),
            ("quotes.csv", FormatKind::Tabular),
        ];
        for (file, owner) in cases {
            for kind in FormatKind::REGISTRY {
                assert_eq!(
                    kind.recognizes(Path::new(file)),
                    kind == owner,
                    "{kind:?} on {file}"
                );
            }
        }
    }

    #[test]
    fn recognizes_is_case_sensitive_and_needs_an_extension() {
        assert!(!FormatKind::PlainText.recognizes(Path::new("QUOTES.TXT")));
        assert!(!FormatKind::PlainText.recognizes(Path::new("txt")));
        assert!(!FormatKind::PlainText.recognizes(Path::new(".txt")));
        assert!(FormatKind::PlainText.recognizes(Path::new("dir.d/q.tar.txt")));
        assert!(!FormatKind::WordDocument.recognizes(Path::new("q.doc")));
    }

    #[test]
    fn detect_follows_registry() {
        assert_eq!(
            FormatKind::detect(Path::new("a/b.csv")),
            Some(FormatKind::Tabular)
        );
        assert_eq!(FormatKind::detect(Path::new("a/b.png")), None);
    }

    #[test]
    fn png_is_unsupported() {
        let err = parse("dog.png").unwrap_err();
        match err {
            MemeError::UnsupportedFormat { path } => assert_eq!(path, PathBuf::from("dog.png")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn retry_recovers_from_one_transient_failure() {
        let calls = Cell::new(0);
        let result = RetryPolicy::new(1).run(Path::new("q.txt"), || {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(MemeError::PdfExtraction {
                    path: "q.pdf".into(),
                    detail: "locked".into(),
                })
            } else {
                Ok(7)
            }
        });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn retry_gives_up_after_one_retry() {
        let calls = Cell::new(0);
        let result: Result<(), _> = RetryPolicy::new(1).run(Path::new("q.csv"), || {
            calls.set(calls.get() + 1);
            Err(MemeError::FileNotFound {
                path: "q.csv".into(),
            })
        });
        assert!(matches!(result, Err(MemeError::FileNotFound { .. })));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn retry_skips_non_retryable_errors() {
        let calls = Cell::new(0);
        let result: Result<(), _> = RetryPolicy::new(3).run(Path::new("q.txt"), || {
            calls.set(calls.get() + 1);
            Err(MemeError::MissingAuthor)
        });
        assert!(matches!(result, Err(MemeError::MissingAuthor)));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn missing_file_fails_after_retry() {
        let err = parse("/definitely/not/here/quotes.txt").unwrap_err();
        assert!(matches!(err, MemeError::FileNotFound { .. }));
    }

    #[test]
    fn parse_all_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.csv");
        std::fs::write(&first, "One - A\nTwo - B\n").unwrap();
        std::fs::write(&second, "body,author\nThree,C\n").unwrap();

        let quotes = Ingestor::default().parse_all([&first, &second]).unwrap();
        let bodies: Vec<&str> = quotes.iter().map(|q| q.body()).collect();
        assert_eq!(bodies, ["One", "Two", "Three"]);
    }

    #[test]
    fn parse_all_propagates_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.txt");
        std::fs::write(&good, "One - A\n").unwrap();
        let err = Ingestor::default()
            .parse_all([good, dir.path().join("dog.png")])
            .unwrap_err();
        assert!(matches!(err, MemeError::UnsupportedFormat { .. }));
    }
}
