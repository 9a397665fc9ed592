use pdfium_render::prelude::*;

use crate::error::FacturaError;
use crate::extraction::{PageWords, WordExtractor, WordToken};
use crate::layout::LINE_TOLERANCE;

/// PDF word-extraction backend using pdfium (Chromium's PDF library).
///
/// Walks page characters in text order and groups consecutive non-whitespace
/// characters into words, capturing each word's position and font style from
/// its first character. Coordinates are flipped so `top` is measured from the
/// page's top edge, matching typical top-to-bottom invoice reading order.
pub struct PdfiumWordExtractor;

impl PdfiumWordExtractor {
    pub fn new() -> Self {
        PdfiumWordExtractor
    }

    /// Check whether the pdfium dynamic library can be bound.
    pub fn is_available() -> bool {
        Pdfium::bind_to_system_library().is_ok()
    }
}

impl Default for PdfiumWordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl WordExtractor for PdfiumWordExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageWords>, FacturaError> {
        let bindings =
            Pdfium::bind_to_system_library().map_err(|_| FacturaError::PdfiumUnavailable)?;
        let pdfium = Pdfium::new(bindings);

        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(|e| FacturaError::Extraction(format!("failed to parse PDF: {e}")))?;

        let mut pages = Vec::new();
        for (index, page) in document.pages().iter().enumerate() {
            let page_height = page.height().value;
            let text = page.text().map_err(|e| {
                FacturaError::Extraction(format!("failed to read text of page {}: {e}", index + 1))
            })?;

            pages.push(PageWords {
                page_number: index + 1,
                words: collect_words(&text, page_height),
            });
        }

        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdfium"
    }
}

/// Group a page's characters into word tokens.
///
/// A word closes at whitespace and whenever the vertical position jumps
/// beyond the line tolerance, so no token ever spans visual rows.
fn collect_words(text: &PdfPageText<'_>, page_height: f32) -> Vec<WordToken> {
    let mut words = Vec::new();
    let mut current: Option<WordBuilder> = None;

    for ch in text.chars().iter() {
        let Some(unicode) = ch.unicode_char() else {
            flush(&mut current, &mut words);
            continue;
        };
        if unicode.is_whitespace() {
            flush(&mut current, &mut words);
            continue;
        }
        let Ok(bounds) = ch.tight_bounds() else {
            flush(&mut current, &mut words);
            continue;
        };

        let top = page_height - bounds.top().value;
        match current.as_mut() {
            Some(word) if (top - word.top).abs() <= LINE_TOLERANCE => {
                word.text.push(unicode);
            }
            _ => {
                flush(&mut current, &mut words);
                current = Some(WordBuilder {
                    text: unicode.to_string(),
                    top,
                    x0: bounds.left().value,
                    size: ch.scaled_font_size().value,
                    fontname: ch.font_name(),
                    bold: char_is_bold(&ch),
                });
            }
        }
    }

    flush(&mut current, &mut words);
    words
}

fn flush(current: &mut Option<WordBuilder>, words: &mut Vec<WordToken>) {
    if let Some(word) = current.take() {
        words.push(WordToken {
            text: word.text,
            top: word.top,
            x0: word.x0,
            size: word.size,
            fontname: word.fontname,
            bold: word.bold,
        });
    }
}

struct WordBuilder {
    text: String,
    top: f32,
    x0: f32,
    size: f32,
    fontname: String,
    bold: bool,
}

fn char_is_bold(ch: &PdfPageTextChar<'_>) -> bool {
    let weight_is_bold = match ch.font_weight() {
        Some(PdfFontWeight::Weight600)
        | Some(PdfFontWeight::Weight700Bold)
        | Some(PdfFontWeight::Weight800)
        | Some(PdfFontWeight::Weight900) => true,
        Some(PdfFontWeight::Custom(weight)) => weight >= 600,
        _ => false,
    };
    weight_is_bold
        || ch.font_is_bold_reenforced()
        || ch.font_name().to_lowercase().contains("bold")
}
