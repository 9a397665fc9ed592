#[derive(Debug, thiserror::Error)]
pub enum FacturaError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdfium library not found. Install the pdfium dynamic library (e.g. libpdfium.so) or point PDFIUM_DYNAMIC_LIB_PATH at it")]
    PdfiumUnavailable,

    #[error("no text could be extracted from the PDF")]
    EmptyDocument,

    #[error("model response contained no parseable JSON object")]
    ModelResponse { raw: String },

    #[error("spreadsheet generation failed: {0}")]
    Spreadsheet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
