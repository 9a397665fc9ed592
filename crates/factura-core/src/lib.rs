pub mod error;
pub mod extraction;
pub mod layout;
pub mod model;
pub mod response;
pub mod spreadsheet;

use error::FacturaError;
use extraction::WordExtractor;

/// Main API entry point: reconstruct a bill PDF's annotated text document.
///
/// Extracts word tokens per page through the given backend, clusters them
/// into visual lines, tags each line's role (title / emphasis / body) from
/// its font metrics, and concatenates the role-tagged pages. Fails with
/// [`FacturaError::EmptyDocument`] when no page yields any text.
pub fn reconstruct_document(
    pdf_bytes: &[u8],
    extractor: &dyn WordExtractor,
) -> Result<String, FacturaError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    layout::build_document(&pages)
}
