use thiserror::Error;

/// Reasons an import produces no record at all.
///
/// Row-level problems never show up here; they are skipped during import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read workbook: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode workbook: {0}")]
    Decode(#[from] calamine::Error),

    #[error("Unsupported file extension: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to build template workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
