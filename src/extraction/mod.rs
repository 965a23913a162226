pub mod extractor;
pub mod ocr;
pub mod parse;
pub mod pdf;
pub mod pdf_renderer;
pub mod types;
pub mod validate;

pub use extractor::ReportExtractor;
pub use ocr::MockOcrEngine;
pub use pdf::PdfTextExtractor;
pub use pdf_renderer::LopdfImageExtractor;
pub use types::{OcrEngine, PdfPageRenderer, PdfTextSource};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OCR initialization failed: {0}")]
    OcrInit(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Tessdata not found at: {0}")]
    TessdataNotFound(std::path::PathBuf),

    #[error("Unsupported format for extraction: {0}")]
    UnsupportedFormat(String),
}
