//! Plain-text quotes, plus the line rule shared by the free-text formats.

use crate::error::MemeError;
use crate::quote::QuoteRecord;
use std::path::Path;
use tracing::debug;

/// Separator between body and author.
pub const SEPARATOR: char = '-';

/// Split `body - author` into a quote.
///
/// Returns `None` unless the line holds exactly one [`SEPARATOR`]. Both halves
/// are whitespace-trimmed.
pub fn split_quote_line(line: &str) -> Option<QuoteRecord> {
    if line.matches(SEPARATOR).count() != 1 {
        return None;
    }
    let (body, author) = line.split_once(SEPARATOR)?;
    Some(QuoteRecord::new(body.trim(), author.trim()))
}

/// Apply [`split_quote_line`] to every line of `content`.
pub fn quotes_from_lines(content: &str) -> Vec<QuoteRecord> {
    content.lines().filter_map(split_quote_line).collect()
}

/// Read a UTF-8 text file, one quote per line.
pub fn extract(path: &Path) -> Result<Vec<QuoteRecord>, MemeError> {
    let content = std::fs::read_to_string(path).map_err(|e| MemeError::from_io(path, e))?;
    let quotes = quotes_from_lines(&content);
    debug!(
        "{}: {} of {} lines are quotes",
        path.display(),
        quotes.len(),
        content.lines().count()
    );
    Ok(quotes)
}
