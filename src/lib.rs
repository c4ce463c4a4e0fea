//! # quote-meme
//!
//! Read quotes out of text, Word, PDF and CSV files and composite them onto
//! pictures as memes.
//!
//! ## Pipeline Overview
//!
//! ```text
//! quote files                       image (path / URL / random)
//!  │                                 │
//!  ├─ 1. Detect   extension → format ├─ 4. Load    decode, resize to width
//!  ├─ 2. Extract  txt/docx/pdf/csv   ├─ 5. Layout  wrap, fit font, place
//!  └─ 3. Split    "body - author"    ├─ 6. Draw    white text
//!        │                           └─ 7. Save    meme_{average hash}.jpg
//!        └──────── QuoteRecord ──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quote_meme::{parse, ComposerConfig, MemeComposer, DEFAULT_WIDTH};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let quotes = parse("_data/DogQuotes/DogQuotesTXT.txt")?;
//!     let composer = MemeComposer::new(ComposerConfig::default())?;
//!     let quote = &quotes[0];
//!     let path = composer.make_meme(
//!         "_data/photos/dog/xander_1.jpg",
//!         quote.body(),
//!         quote.author(),
//!         Some(DEFAULT_WIDTH),
//!     )?;
//!     println!("{}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `meme` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! quote-meme = { version = "0.1", default-features = false }
//! ```
//!
//! ## External Tools
//!
//! PDF quote files go through `pdftotext` from poppler-utils. Every other
//! format is read in-process.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod catalog;
pub mod compose;
pub mod config;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod ingest;
pub mod quote;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use catalog::list_images;
pub use compose::font::{GlyphFont, TextExtent, TextMeasure};
pub use compose::{MemeComposer, RenderedMeme};
pub use config::{
    ComposerConfig, ComposerConfigBuilder, IngestConfig, IngestConfigBuilder, DEFAULT_WIDTH,
};
pub use error::MemeError;
pub use fetch::{fetch_image, FetchedImage};
pub use generate::{generate_meme, MemeSources};
pub use ingest::{parse, FormatKind, Ingestor, RetryPolicy};
pub use quote::QuoteRecord;
