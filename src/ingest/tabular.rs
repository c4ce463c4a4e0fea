//! CSV quotes: structured input, one row per quote.

use crate::error::MemeError;
use crate::quote::QuoteRecord;
use serde::Deserialize;
use std::path::Path;

/// Columns are matched by header name, so their order does not matter and
/// extra columns are ignored.
#[derive(Debug, Deserialize)]
struct Row {
    body: String,
    author: String,
}

/// Read a CSV file with a `body,author` header row.
pub fn extract(path: &Path) -> Result<Vec<QuoteRecord>, MemeError> {
    let file = std::fs::File::open(path).map_err(|e| MemeError::from_io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    reader
        .deserialize::<Row>()
        .map(|row| {
            let row = row.map_err(|source| MemeError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(QuoteRecord::new(row.body, row.author))
        })
        .collect()
}
