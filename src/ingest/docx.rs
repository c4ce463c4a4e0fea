//! Word documents: one quote per body paragraph.
//!
//! A `.docx` file is a ZIP archive of Office Open XML parts. Only
//! `word/document.xml` matters here; each body-level `w:p` becomes one line of
//! text (`w:t` runs concatenated, `w:tab` as a tab, `w:br`/`w:cr` as a
//! newline) and is fed through the single-hyphen rule. Paragraphs nested in
//! tables or text boxes are not body paragraphs and are skipped, along with
//! their text.

use crate::error::MemeError;
use crate::ingest::text::split_quote_line;
use crate::quote::QuoteRecord;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const DOCUMENT_PART: &str = "word/document.xml";

/// Read a `.docx` file, one quote per paragraph.
pub fn extract(path: &Path) -> Result<Vec<QuoteRecord>, MemeError> {
    let xml = read_document_part(path)?;
    let paragraphs = body_paragraphs(&xml).map_err(|detail| MemeError::Docx {
        path: path.to_path_buf(),
        detail,
    })?;
    debug!("{}: {} paragraphs", path.display(), paragraphs.len());

    Ok(paragraphs
        .iter()
        .filter_map(|p| split_quote_line(p))
        .collect())
}

fn read_document_part(path: &Path) -> Result<String, MemeError> {
    let file = std::fs::File::open(path).map_err(|e| MemeError::from_io(path, e))?;
    let docx_err = |detail: String| MemeError::Docx {
        path: path.to_path_buf(),
        detail,
    };

    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| docx_err(format!("invalid ZIP: {e}")))?;
    let mut entry = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| docx_err(format!("missing {DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| docx_err(format!("unreadable {DOCUMENT_PART}: {e}")))?;
    Ok(xml)
}

/// Plain text of every body-level paragraph, in document order.
pub fn body_paragraphs(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;
    // Depth inside tables and text boxes.
    let mut nested = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                match e.local_name().as_ref() {
                    b"tbl" | b"txbxContent" => nested += 1,
                    b"p" if nested == 0 && !in_paragraph => {
                        in_paragraph = true;
                        current.clear();
                    }
                    b"t" if in_paragraph && nested == 0 => in_text = true,
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) if in_paragraph && nested == 0 => {
                match e.local_name().as_ref() {
                    b"tab" => current.push('\t'),
                    b"br" | b"cr" => current.push('\n'),
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) if in_text && nested == 0 => {
                let text = e
                    .unescape()
                    .map_err(|err| format!("bad text at byte {}: {err}", reader.buffer_position()))?;
                current.push_str(&text);
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => nested = nested.saturating_sub(1),
                b"t" => in_text = false,
                b"p" if in_paragraph && nested == 0 => {
                    in_paragraph = false;
                    paragraphs.push(std::mem::take(&mut current));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}
