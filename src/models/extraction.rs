use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Accepted upload kinds for report extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Pdf,
    Jpg,
    Jpeg,
    Png,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Pdf => "pdf",
            ReportKind::Jpg => "jpg",
            ReportKind::Jpeg => "jpeg",
            ReportKind::Png => "png",
        }
    }

    /// Parse the declared file type from an upload. Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(ReportKind::Pdf),
            "jpg" => Some(ReportKind::Jpg),
            "jpeg" => Some(ReportKind::Jpeg),
            "png" => Some(ReportKind::Png),
            _ => None,
        }
    }

    pub fn is_pdf(self) -> bool {
        matches!(self, ReportKind::Pdf)
    }
}

/// One clinical value recognized in report text, with enough
/// provenance for a reviewer to audit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub value: f64,
    pub unit: String,
    pub confidence: f32,
    /// The source line the value was matched in.
    pub raw_line: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Result of one report extraction request. Transient: exists until the
/// caller pre-fills the assessment form or discards it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportExtraction {
    pub id: Uuid,
    pub fields: BTreeMap<String, ExtractedField>,
    /// Confidence of the text-acquisition stage alone.
    pub ocr_confidence: f32,
    /// Blend of OCR quality and field completeness, rounded to 2 decimals.
    pub overall_confidence: f32,
    pub extracted_at: DateTime<Utc>,
}

impl ReportExtraction {
    /// Terminal failure state: nothing extracted, zero confidence.
    /// The caller falls back to manual form entry.
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            fields: BTreeMap::new(),
            ocr_confidence: 0.0,
            overall_confidence: 0.0,
            extracted_at: Utc::now(),
        }
    }
}
