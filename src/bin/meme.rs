//! CLI binary for quote-meme.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ComposerConfig` / `IngestConfig` and prints the saved meme's path.

use anyhow::{Context, Result};
use clap::Parser;
use quote_meme::{
    fetch_image, generate::pick_image, generate::pick_quote, ComposerConfig, FetchedImage,
    IngestConfig, Ingestor, MemeComposer, MemeSources, DEFAULT_WIDTH,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Random dog photo, random quote from the bundled quote files
  meme

  # Your own photo and quote
  meme -p ./dog.jpg -b "Treat yo self" -a Fluffles

  # Photo from the web (falls back to the placeholder on any failure)
  meme --url https://example.com/dog.jpg -b "Woof" -a Rex

  # Reproducible placement, machine-readable result
  meme --seed 42 --json

QUOTE FILES:
  .txt   one "body - author" per line, lines without exactly one '-' skipped
  .docx  same rule per paragraph, tables ignored
  .pdf   text extracted with pdftotext (poppler-utils), then as .txt
  .csv   header row with `body` and `author` columns

ENVIRONMENT:
  Every flag can also be set through its MEME_* variable (see --help).
  RUST_LOG overrides the log filter chosen by -v / -q.
"#;

/// Put a quote on a picture.
#[derive(Parser, Debug)]
#[command(
    name = "meme",
    version,
    about = "Put a quote on a picture",
    long_about = "Compose a meme: an image resized to a fixed width with a quote and its \
author drawn on top in white. Anything not given on the command line (image, quote) is \
picked at random from the image directory and the quote files.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image to use instead of a random one.
    #[arg(short, long, env = "MEME_PATH", conflicts_with = "url")]
    path: Option<PathBuf>,

    /// Quote body. Requires --author.
    #[arg(short, long, env = "MEME_BODY")]
    body: Option<String>,

    /// Quote author.
    #[arg(short, long, env = "MEME_AUTHOR")]
    author: Option<String>,

    /// Fetch the image from this URL instead of --path.
    #[arg(long, env = "MEME_URL")]
    url: Option<String>,

    /// Image used when --url cannot be fetched.
    #[arg(long, env = "MEME_PLACEHOLDER", default_value = "./assets/placeholder.png")]
    placeholder: PathBuf,

    /// Directory searched for random images.
    #[arg(long, env = "MEME_IMAGES_DIR")]
    images_dir: Option<PathBuf>,

    /// Quote file to draw random quotes from (repeatable).
    #[arg(long = "quotes", env = "MEME_QUOTES")]
    quotes: Vec<PathBuf>,

    /// Output directory for the finished meme.
    #[arg(short, long, env = "MEME_OUT_DIR", default_value = "./tmp")]
    out_dir: PathBuf,

    /// TrueType font for both text blocks.
    #[arg(long, env = "MEME_FONT")]
    font: Option<PathBuf>,

    /// Starting body font size in points; shrinks until the text fits.
    #[arg(long, env = "MEME_FONT_SIZE", default_value_t = 40)]
    font_size: u32,

    /// Words per line before the body wraps.
    #[arg(long, env = "MEME_MAX_WORDS", default_value_t = 6)]
    max_words: usize,

    /// Output width in pixels (height follows the aspect ratio).
    #[arg(long, env = "MEME_WIDTH", default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Seed for image, quote and text placement choices.
    #[arg(long, env = "MEME_SEED")]
    seed: Option<u64>,

    /// pdftotext binary used for PDF quote files.
    #[arg(long, env = "MEME_PDFTOTEXT", default_value = "pdftotext")]
    pdftotext: PathBuf,

    /// HTTP timeout for --url in seconds.
    #[arg(long, env = "MEME_DOWNLOAD_TIMEOUT", default_value_t = 30)]
    download_timeout: u64,

    /// Print the rendered meme as JSON instead of just its path.
    #[arg(long, env = "MEME_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MEME_VERBOSE")]
    verbose: bool,

    /// Suppress all logs except errors.
    #[arg(short, long, env = "MEME_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let composer_config = build_composer_config(&cli)?;
    let ingest_config = IngestConfig::builder()
        .pdftotext(&cli.pdftotext)
        .build()
        .context("Invalid ingestion settings")?;
    let composer = MemeComposer::new(composer_config).context("Failed to load font")?;
    let ingestor = Ingestor::new(ingest_config);

    let mut sources = MemeSources::default();
    if let Some(dir) = &cli.images_dir {
        sources.images_dir = dir.clone();
    }
    if !cli.quotes.is_empty() {
        sources.quote_files = cli.quotes.clone();
    }

    // ── Fetch remote image ───────────────────────────────────────────────
    let fetched: Option<FetchedImage> = match &cli.url {
        Some(url) => {
            Some(fetch_image(url, &cli.out_dir, &cli.placeholder, cli.download_timeout).await)
        }
        None => None,
    };
    let image = fetched
        .as_ref()
        .map(|f| f.path().to_path_buf())
        .or_else(|| cli.path.clone());

    // ── Compose ──────────────────────────────────────────────────────────
    let seed = cli.seed;
    let body = cli.body.clone();
    let author = cli.author.clone();
    let width = cli.width;
    let meme = tokio::task::spawn_blocking(move || {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let quote = pick_quote(
            &sources,
            &ingestor,
            body.as_deref(),
            author.as_deref(),
            &mut rng,
        )?;
        let image = pick_image(&sources, image.as_deref(), &mut rng)?;
        composer.compose_with_rng(&image, quote.body(), quote.author(), Some(width), &mut rng)
    })
    .await
    .context("Composition task panicked")?
    .context("Failed to make meme")?;

    // The downloaded image is only needed until composition finishes.
    drop(fetched);

    if cli.json {
        let json = serde_json::to_string_pretty(&meme).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        println!("{}", meme.path.display());
    }

    Ok(())
}

/// Map CLI args to `ComposerConfig`.
fn build_composer_config(cli: &Cli) -> Result<ComposerConfig> {
    let mut builder = ComposerConfig::builder()
        .output_dir(&cli.out_dir)
        .font_size(cli.font_size)
        .max_words_per_line(cli.max_words);
    if let Some(font) = &cli.font {
        builder = builder.font_path(font);
    }
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    builder.build().context("Invalid composer settings")
}
