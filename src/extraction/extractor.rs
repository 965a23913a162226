//! The report-extraction façade.
//!
//! Text acquisition is layered: digital PDFs surrender their native
//! text layer; scanned PDFs fall back to per-page OCR over extracted
//! page images; plain images go straight to OCR. Acquisition, parsing,
//! and validation all happen inside `extract`, which traps every error
//! into the zero-confidence failure state: the caller's graceful path
//! is manual form entry, never an exception.
//!
//! Blocking I/O and OCR make this a slow call; run it off any
//! latency-sensitive request path.

use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use crate::models::extraction::{ReportExtraction, ReportKind};

use super::parse;
use super::types::{OcrEngine, PdfPageRenderer, PdfTextSource};
use super::validate;
use super::ExtractionError;

/// Number of key vitals a complete report is expected to carry; the
/// completeness share of the overall confidence is measured against it.
const EXPECTED_FIELD_COUNT: usize = 12;

/// Native text layers longer than this are trusted without OCR.
const TEXT_LAYER_MIN_CHARS: usize = 100;

pub struct ReportExtractor {
    ocr_engine: Box<dyn OcrEngine + Send + Sync>,
    pdf_text: Box<dyn PdfTextSource + Send + Sync>,
    pdf_renderer: Option<Box<dyn PdfPageRenderer + Send + Sync>>,
}

impl ReportExtractor {
    pub fn new(
        ocr_engine: Box<dyn OcrEngine + Send + Sync>,
        pdf_text: Box<dyn PdfTextSource + Send + Sync>,
    ) -> Self {
        Self {
            ocr_engine,
            pdf_text,
            pdf_renderer: None,
        }
    }

    /// Add a page renderer for per-page OCR of scanned PDFs.
    pub fn with_pdf_renderer(mut self, renderer: Box<dyn PdfPageRenderer + Send + Sync>) -> Self {
        self.pdf_renderer = Some(renderer);
        self
    }

    /// Convenience for upload handlers that carry the declared file
    /// type as a string. Unknown kinds are an unsupported format and
    /// yield the empty zero-confidence result.
    pub fn extract_declared(&self, path: &Path, kind: &str) -> ReportExtraction {
        match ReportKind::parse(kind) {
            Some(kind) => self.extract(path, kind),
            None => {
                let err = ExtractionError::UnsupportedFormat(kind.to_string());
                tracing::error!(error = %err, "Cannot extract report");
                ReportExtraction::empty()
            }
        }
    }

    /// Extract clinical fields from an uploaded report file. Never
    /// fails: an unreadable or unrecognizable file yields the empty
    /// zero-confidence result.
    pub fn extract(&self, path: &Path, kind: ReportKind) -> ReportExtraction {
        tracing::info!(
            path = %path.display(),
            kind = kind.as_str(),
            "Starting report extraction"
        );
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read report file");
                return ReportExtraction::empty();
            }
        };
        self.extract_bytes(&bytes, kind)
    }

    /// Same contract as [`extract`], for callers holding the upload
    /// in memory.
    pub fn extract_bytes(&self, bytes: &[u8], kind: ReportKind) -> ReportExtraction {
        let (text, ocr_confidence) = self.acquire_text(bytes, kind);
        if text.trim().is_empty() {
            tracing::info!("No text extracted from report");
            return ReportExtraction::empty();
        }

        let mut fields = parse::parse_report_text(&text);
        validate::validate_fields(&mut fields);
        validate::inject_defaults(&mut fields);

        let found = fields
            .keys()
            .filter(|name| !validate::DEFAULT_FIELDS.contains(&name.as_str()))
            .count();
        let completeness = (found as f32 / EXPECTED_FIELD_COUNT as f32).min(1.0);
        let overall_confidence = round2(ocr_confidence * 0.4 + completeness * 0.6);

        tracing::info!(
            fields = found,
            ocr_confidence,
            overall_confidence,
            "Report extraction complete"
        );

        ReportExtraction {
            id: Uuid::new_v4(),
            fields,
            ocr_confidence,
            overall_confidence,
            extracted_at: Utc::now(),
        }
    }

    /// Text acquisition state machine. Any failure is terminal: empty
    /// text and zero confidence, downstream parsing skipped.
    fn acquire_text(&self, bytes: &[u8], kind: ReportKind) -> (String, f32) {
        let acquired = if kind.is_pdf() {
            self.pdf_text_then_ocr(bytes)
        } else {
            self.image_ocr(bytes)
        };
        match acquired {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Text acquisition failed");
                (String::new(), 0.0)
            }
        }
    }

    fn pdf_text_then_ocr(&self, bytes: &[u8]) -> Result<(String, f32), ExtractionError> {
        let pages = self.pdf_text.extract_text(bytes)?;
        let text = pages.join("\n");
        if text.trim().len() > TEXT_LAYER_MIN_CHARS {
            tracing::debug!(chars = text.len(), "Using native PDF text layer");
            return Ok((text, 0.9));
        }

        tracing::info!("PDF appears to be image-based, using OCR");
        let text = self.ocr_pdf_pages(bytes, pages.len())?;
        let confidence = if text.trim().len() > 50 { 0.7 } else { 0.3 };
        Ok((text, confidence))
    }

    fn ocr_pdf_pages(&self, bytes: &[u8], page_count: usize) -> Result<String, ExtractionError> {
        let Some(renderer) = self.pdf_renderer.as_deref() else {
            tracing::warn!("No PDF page renderer available, OCR on raw PDF bytes");
            return self.ocr_engine.ocr_image(bytes);
        };

        let mut text = String::new();
        for page_index in 0..page_count {
            let page_image = renderer.render_page(bytes, page_index)?;
            let page_text = self.ocr_engine.ocr_image(&page_image)?;
            tracing::debug!(page = page_index + 1, chars = page_text.len(), "OCR page done");
            text.push_str(&page_text);
            text.push('\n');
        }
        Ok(text)
    }

    fn image_ocr(&self, bytes: &[u8]) -> Result<(String, f32), ExtractionError> {
        let text = self.ocr_engine.ocr_image(bytes)?;
        let confidence = if text.trim().len() > 100 { 0.8 } else { 0.5 };
        Ok((text, confidence))
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ocr::MockOcrEngine;
    use crate::extraction::pdf::{make_test_pdf, PdfTextExtractor};

    const SAMPLE_REPORT: &str = "Patient: John Doe\n\
        Blood Pressure: 145/95 mmHg\n\
        Fasting Glucose: 130 mg/dL\n\
        HbA1c: 7.2\n\
        Total Cholesterol: 220 mg/dL\n\
        HDL: 45\n\
        LDL: 140\n\
        Triglycerides: 180\n\
        Heart Rate: 88 bpm\n\
        Temp: 98.6\n\
        Creatinine: 1.1\n\
        Hemoglobin: 14.2";

    struct MockPdfSource {
        pages: Vec<String>,
        fail: bool,
    }

    impl MockPdfSource {
        fn with_pages(pages: &[&str]) -> Self {
            Self {
                pages: pages.iter().map(|p| p.to_string()).collect(),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                pages: vec![],
                fail: true,
            }
        }
    }

    impl PdfTextSource for MockPdfSource {
        fn extract_text(&self, _pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
            if self.fail {
                return Err(ExtractionError::PdfParsing("mock failure".into()));
            }
            Ok(self.pages.clone())
        }
    }

    struct MockRenderer;

    impl PdfPageRenderer for MockRenderer {
        fn render_page(
            &self,
            _pdf_bytes: &[u8],
            _page_index: usize,
        ) -> Result<Vec<u8>, ExtractionError> {
            Ok(b"fake page image".to_vec())
        }
    }

    #[test]
    fn image_report_parses_fields_end_to_end() {
        let extractor = ReportExtractor::new(
            Box::new(MockOcrEngine::new(SAMPLE_REPORT)),
            Box::new(MockPdfSource::with_pages(&[])),
        );
        let report = extractor.extract_bytes(b"fake image", ReportKind::Jpg);

        // Long OCR text → 0.8, all 12 fields found → completeness 1.0
        assert_eq!(report.ocr_confidence, 0.8);
        assert_eq!(report.overall_confidence, 0.92);
        assert_eq!(report.fields["systolic_bp"].value, 145.0);
        assert_eq!(report.fields["temperature"].value, 37.0);
        // Defaults injected on top of the 12 parsed fields.
        assert_eq!(report.fields.len(), 14);
        assert_eq!(report.fields["stress_level"].value, 5.0);
    }

    #[test]
    fn short_image_text_has_lower_confidence() {
        let extractor = ReportExtractor::new(
            Box::new(MockOcrEngine::new("Glucose: 110")),
            Box::new(MockPdfSource::with_pages(&[])),
        );
        let report = extractor.extract_bytes(b"fake image", ReportKind::Png);
        assert_eq!(report.ocr_confidence, 0.5);
        // One field of twelve: 0.5*0.4 + (1/12)*0.6 = 0.25
        assert_eq!(report.overall_confidence, 0.25);
        assert_eq!(report.fields["fasting_glucose"].value, 110.0);
    }

    #[test]
    fn failed_ocr_yields_empty_result() {
        let extractor = ReportExtractor::new(
            Box::new(MockOcrEngine::failing()),
            Box::new(MockPdfSource::with_pages(&[])),
        );
        let report = extractor.extract_bytes(b"fake image", ReportKind::Jpg);
        assert!(report.fields.is_empty());
        assert_eq!(report.overall_confidence, 0.0);
    }

    #[test]
    fn undeclared_file_kind_yields_empty_result() {
        let extractor = ReportExtractor::new(
            Box::new(MockOcrEngine::new(SAMPLE_REPORT)),
            Box::new(MockPdfSource::with_pages(&[])),
        );
        let report = extractor.extract_declared(Path::new("/tmp/report.tiff"), "tiff");
        assert!(report.fields.is_empty());
        assert_eq!(report.overall_confidence, 0.0);
    }

    #[test]
    fn unreadable_file_yields_empty_result() {
        let extractor = ReportExtractor::new(
            Box::new(MockOcrEngine::new("unused")),
            Box::new(MockPdfSource::with_pages(&[])),
        );
        let report = extractor.extract(Path::new("/nonexistent/report.pdf"), ReportKind::Pdf);
        assert!(report.fields.is_empty());
        assert_eq!(report.overall_confidence, 0.0);
    }

    #[test]
    fn digital_pdf_uses_native_text_layer() {
        let pdf = make_test_pdf(SAMPLE_REPORT);
        let extractor = ReportExtractor::new(
            Box::new(MockOcrEngine::new("unused")),
            Box::new(PdfTextExtractor),
        );
        let report = extractor.extract_bytes(&pdf, ReportKind::Pdf);
        assert_eq!(report.ocr_confidence, 0.9);
        assert_eq!(report.fields["fasting_glucose"].value, 130.0);
        assert_eq!(report.fields["hba1c"].value, 7.2);
    }

    #[test]
    fn scanned_pdf_falls_back_to_page_ocr() {
        let extractor = ReportExtractor::new(
            Box::new(MockOcrEngine::new(
                "Blood Pressure: 145/95\nGlucose: 130 and some surrounding text",
            )),
            Box::new(MockPdfSource::with_pages(&["", ""])),
        )
        .with_pdf_renderer(Box::new(MockRenderer));

        let report = extractor.extract_bytes(b"fake pdf", ReportKind::Pdf);
        // Combined OCR text > 50 chars → 0.7
        assert_eq!(report.ocr_confidence, 0.7);
        assert_eq!(report.fields["systolic_bp"].value, 145.0);
        assert_eq!(report.fields["fasting_glucose"].value, 130.0);
    }

    #[test]
    fn scanned_pdf_with_short_ocr_text_is_low_confidence() {
        let extractor = ReportExtractor::new(
            Box::new(MockOcrEngine::new("HR: 72")),
            Box::new(MockPdfSource::with_pages(&[""])),
        )
        .with_pdf_renderer(Box::new(MockRenderer));

        let report = extractor.extract_bytes(b"fake pdf", ReportKind::Pdf);
        assert_eq!(report.ocr_confidence, 0.3);
        assert_eq!(report.fields["heart_rate"].value, 72.0);
    }

    #[test]
    fn unparseable_pdf_yields_empty_result() {
        let extractor = ReportExtractor::new(
            Box::new(MockOcrEngine::new("unused")),
            Box::new(MockPdfSource::failing()),
        );
        let report = extractor.extract_bytes(b"not a pdf", ReportKind::Pdf);
        assert!(report.fields.is_empty());
        assert_eq!(report.overall_confidence, 0.0);
    }

    #[test]
    fn out_of_range_value_survives_with_note() {
        let extractor = ReportExtractor::new(
            Box::new(MockOcrEngine::new("Glucose: 650 mg/dL, recheck advised")),
            Box::new(MockPdfSource::with_pages(&[])),
        );
        let report = extractor.extract_bytes(b"fake image", ReportKind::Jpg);
        let glucose = &report.fields["fasting_glucose"];
        assert_eq!(glucose.value, 650.0);
        assert_eq!(glucose.confidence, 0.3);
        assert!(glucose.note.is_some());
    }

    #[test]
    fn text_without_fields_scores_completeness_zero() {
        let long_prose = "This report contains narrative text only, with no \
                          laboratory values anywhere in the body of the document.";
        let extractor = ReportExtractor::new(
            Box::new(MockOcrEngine::new(long_prose)),
            Box::new(MockPdfSource::with_pages(&[])),
        );
        let report = extractor.extract_bytes(b"fake image", ReportKind::Jpg);
        // Only injected defaults: found = 0 → overall = 0.8 * 0.4
        assert_eq!(report.fields.len(), 2);
        assert_eq!(report.overall_confidence, 0.32);
    }
}
