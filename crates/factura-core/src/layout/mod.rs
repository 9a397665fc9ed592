pub mod classify;
pub mod lines;

pub use classify::{classify_line, common_font_size, LineRole};
pub use lines::{cluster_lines, Line, LINE_TOLERANCE};

use crate::error::FacturaError;
use crate::extraction::PageWords;

/// Width of the `=` separator emitted after each non-empty page.
pub const PAGE_SEPARATOR_WIDTH: usize = 50;

/// Render one page's words into role-tagged text.
///
/// Title lines are prefixed with `★ TÍTULO:` and isolated by blank lines,
/// emphasized lines get a bullet marker, and body lines are concatenated
/// with a trailing space so consecutive body rows read as one paragraph.
/// A page without words renders nothing, separator included.
pub fn render_page(page: &PageWords) -> Option<String> {
    if page.words.is_empty() {
        return None;
    }

    let lines = cluster_lines(&page.words);
    let common_size = common_font_size(&page.words)?;

    let mut out = String::new();
    for line in &lines {
        let text = line.text();
        match classify_line(line, common_size) {
            LineRole::Title => {
                out.push_str("\n★ TÍTULO: ");
                out.push_str(&text);
                out.push('\n');
            }
            LineRole::Emphasis => {
                out.push_str("\n• ");
                out.push_str(&text);
                out.push('\n');
            }
            LineRole::Body => {
                out.push_str(&text);
                out.push(' ');
            }
        }
    }

    out.push('\n');
    out.push_str(&"=".repeat(PAGE_SEPARATOR_WIDTH));
    out.push('\n');
    Some(out)
}

/// Build the annotated document for a whole PDF.
///
/// Empty pages are skipped silently; a document that yields no text at all
/// is an extraction failure, never an empty string.
pub fn build_document(pages: &[PageWords]) -> Result<String, FacturaError> {
    let mut text = String::new();
    for page in pages {
        if let Some(rendered) = render_page(page) {
            text.push_str(&rendered);
        }
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FacturaError::EmptyDocument);
    }
    Ok(trimmed.to_string())
}
