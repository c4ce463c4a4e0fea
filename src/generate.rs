//! One-call meme generation from a photo library and a quote library.
//!
//! Any part the caller leaves out is picked at random: an image from
//! [`MemeSources::images_dir`], a quote from the records parsed out of
//! [`MemeSources::quote_files`].

use crate::catalog::list_images;
use crate::compose::MemeComposer;
use crate::error::MemeError;
use crate::ingest::Ingestor;
use crate::quote::QuoteRecord;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where random images and quotes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemeSources {
    pub images_dir: PathBuf,
    pub quote_files: Vec<PathBuf>,
}

impl Default for MemeSources {
    fn default() -> Self {
        let quotes = Path::new("./_data/DogQuotes");
        Self {
            images_dir: PathBuf::from("./_data/photos/dog/"),
            quote_files: vec![
                quotes.join("DogQuotesTXT.txt"),
                quotes.join("DogQuotesDOCX.docx"),
                quotes.join("DogQuotesPDF.pdf"),
                quotes.join("DogQuotesCSV.csv"),
            ],
        }
    }
}

/// The image to use: `image` when given, otherwise a random catalogue entry.
pub fn pick_image<R: Rng + ?Sized>(
    sources: &MemeSources,
    image: Option<&Path>,
    rng: &mut R,
) -> Result<PathBuf, MemeError> {
    if let Some(image) = image {
        return Ok(image.to_path_buf());
    }
    let images = list_images(&sources.images_dir)?;
    images
        .choose(rng)
        .cloned()
        .ok_or_else(|| MemeError::NoImages {
            dir: sources.images_dir.clone(),
        })
}

/// The quote to use: `body` and `author` when given, otherwise a random
/// parsed record.
///
/// A body without an author is rejected before any file is read. An author
/// without a body is ignored.
pub fn pick_quote<R: Rng + ?Sized>(
    sources: &MemeSources,
    ingestor: &Ingestor,
    body: Option<&str>,
    author: Option<&str>,
    rng: &mut R,
) -> Result<QuoteRecord, MemeError> {
    match (body, author) {
        (Some(body), Some(author)) => Ok(QuoteRecord::new(body, author)),
        (Some(_), None) => Err(MemeError::MissingAuthor),
        (None, _) => {
            let quotes = ingestor.parse_all(&sources.quote_files)?;
            debug!("Choosing among {} quotes", quotes.len());
            quotes.choose(rng).cloned().ok_or(MemeError::NoQuotes)
        }
    }
}

/// Generate a meme, filling in whatever was not supplied at random.
#[allow(clippy::too_many_arguments)]
pub fn generate_meme<R: Rng + ?Sized>(
    sources: &MemeSources,
    ingestor: &Ingestor,
    composer: &MemeComposer,
    image: Option<&Path>,
    body: Option<&str>,
    author: Option<&str>,
    width: Option<u32>,
    rng: &mut R,
) -> Result<PathBuf, MemeError> {
    let quote = pick_quote(sources, ingestor, body, author, rng)?;
    let image = pick_image(sources, image, rng)?;
    debug!("Generating meme on {} with {}", image.display(), quote);
    composer.make_meme_with_rng(&image, quote.body(), quote.author(), width, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sources(dir: &Path) -> MemeSources {
        MemeSources {
            images_dir: dir.join("photos"),
            quote_files: vec![dir.join("quotes.txt"), dir.join("quotes.csv")],
        }
    }

    #[test]
    fn default_sources_match_data_layout() {
        let s = MemeSources::default();
        assert_eq!(s.images_dir, PathBuf::from("./_data/photos/dog/"));
        assert_eq!(s.quote_files.len(), 4);
        assert!(s.quote_files[2].ends_with("DogQuotesPDF.pdf"));
    }

    #[test]
    fn body_without_author_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = pick_quote(
            &sources(dir.path()),
            &Ingestor::default(),
            Some("Woof"),
            None,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, MemeError::MissingAuthor));
        assert_eq!(err.to_string(), "Author required if body is used");
    }

    #[test]
    fn explicit_quote_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let quote = pick_quote(
            &sources(dir.path()),
            &Ingestor::default(),
            Some("Woof"),
            Some("Rex"),
            &mut rng,
        )
        .unwrap();
        assert_eq!(quote, QuoteRecord::new("Woof", "Rex"));
    }

    #[test]
    fn random_quote_comes_from_every_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quotes.txt"), "Bark - Rex\n").unwrap();
        std::fs::write(dir.path().join("quotes.csv"), "body,author\nWoof,Fido\n").unwrap();
        let src = sources(dir.path());
        let ingestor = Ingestor::default();
        let allowed = [
            QuoteRecord::new("Bark", "Rex"),
            QuoteRecord::new("Woof", "Fido"),
        ];

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let q = pick_quote(&src, &ingestor, None, None, &mut rng).unwrap();
            assert!(allowed.contains(&q), "{q}");
        }
    }

    #[test]
    fn empty_quote_files_give_no_quotes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quotes.txt"), "no separator here\n").unwrap();
        std::fs::write(dir.path().join("quotes.csv"), "body,author\n").unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = pick_quote(
            &sources(dir.path()),
            &Ingestor::default(),
            None,
            None,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, MemeError::NoQuotes));
    }

    #[test]
    fn empty_photo_dir_gives_no_images() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("photos")).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = pick_image(&sources(dir.path()), None, &mut rng).unwrap_err();
        assert!(matches!(err, MemeError::NoImages { .. }));
    }

    #[test]
    fn random_image_is_from_the_catalogue() {
        let dir = tempfile::tempdir().unwrap();
        let photos = dir.path().join("photos");
        std::fs::create_dir_all(&photos).unwrap();
        std::fs::write(photos.join("a.jpg"), b"x").unwrap();
        std::fs::write(photos.join("b.png"), b"x").unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let picked = pick_image(&sources(dir.path()), None, &mut rng).unwrap();
        assert!(picked == photos.join("a.jpg") || picked == photos.join("b.png"));

        let given = Path::new("/given/dog.jpg");
        assert_eq!(
            pick_image(&sources(dir.path()), Some(given), &mut rng).unwrap(),
            given
        );
    }
}
