use super::ExtractionError;

/// OCR engine abstraction (allows mocking for tests).
pub trait OcrEngine {
    /// Recognize text in an encoded image (PNG/JPEG bytes).
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Native text-layer extraction from a digital PDF.
pub trait PdfTextSource {
    /// Per-page text, in page order. Scanned PDFs yield empty or
    /// near-empty pages.
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Turns one PDF page into an encoded image for OCR.
pub trait PdfPageRenderer {
    fn render_page(&self, pdf_bytes: &[u8], page_index: usize) -> Result<Vec<u8>, ExtractionError>;
}
