//! Error types for the quote-meme library.
//!
//! A single fatal error type, [`MemeError`], covers both halves of the crate:
//!
//! * **Ingestion** errors: the file has no registered parser
//!   ([`MemeError::UnsupportedFormat`]), or extraction failed even after the
//!   dispatcher's retry ([`MemeError::is_retryable`] marks the family that the
//!   retry policy is allowed to repeat).
//! * **Composition** errors: the image or font could not be loaded, the text
//!   cannot be shrunk enough to fit, or the output could not be written.
//!
//! Malformed quote lines are not errors. Parsers skip them silently.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the quote-meme library.
#[derive(Debug, Error)]
pub enum MemeError {
    // ── Caller errors ─────────────────────────────────────────────────────
    /// No registered parser recognises the file's extension.
    #[error("No suitable ingestor for '{path}'\nSupported extensions: .txt, .docx, .pdf, .csv")]
    UnsupportedFormat { path: PathBuf },

    /// A quote body was supplied without an author.
    #[error("Author required if body is used")]
    MissingAuthor,

    // ── Extraction errors (retryable) ─────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Reading the input failed.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The `.docx` archive or its `word/document.xml` part is unreadable.
    #[error("Invalid Word document '{path}': {detail}")]
    Docx { path: PathBuf, detail: String },

    /// The CSV file is malformed or lacks the `body`/`author` columns.
    #[error("Invalid CSV '{path}': {source}\nExpected a header row with 'body' and 'author' columns.")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The external PDF text extractor failed.
    #[error("PDF text extraction failed for '{path}': {detail}")]
    PdfExtraction { path: PathBuf, detail: String },

    /// The external PDF text extractor did not finish in time.
    #[error("PDF text extraction timed out after {secs}s for '{path}'")]
    ExtractionTimeout { path: PathBuf, secs: u64 },

    // ── Composition errors ────────────────────────────────────────────────
    /// The source image could not be decoded, or the output could not be encoded.
    #[error("Image error for '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The font file is missing or not a TrueType/OpenType font.
    #[error("Failed to load font '{path}': {detail}")]
    FontLoad { path: PathBuf, detail: String },

    /// The quote does not fit the image even at the smallest allowed size.
    #[error("Quote does not fit the image at the minimum font size of {min_size}pt\nUse a larger --width or a shorter quote.")]
    FontTooSmall { min_size: u32 },

    /// Could not create the output directory or write the meme file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Generator errors ──────────────────────────────────────────────────
    /// The image directory holds no usable images.
    #[error("No images found under '{dir}'")]
    NoImages { dir: PathBuf },

    /// None of the quote files produced a quote.
    #[error("No quotes found in the configured quote files")]
    NoQuotes,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MemeError {
    /// Whether the ingestion retry policy may repeat the failed extraction.
    ///
    /// Only extraction failures qualify. Format and contract errors would fail
    /// identically on a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MemeError::FileNotFound { .. }
                | MemeError::Io { .. }
                | MemeError::Docx { .. }
                | MemeError::Csv { .. }
                | MemeError::PdfExtraction { .. }
                | MemeError::ExtractionTimeout { .. }
        )
    }

    /// Map an I/O error on `path` to [`MemeError::FileNotFound`] or [`MemeError::Io`].
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            MemeError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            MemeError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}
