//! Regex-based field recognition over extracted report text.
//!
//! One case-insensitive pattern per clinical field; the first matching
//! line wins, scanning lines in order of appearance. Blood pressure is
//! additionally matched as a "systolic/diastolic" composite, which only
//! fills the slots the independent patterns left empty.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::extraction::ExtractedField;

/// Confidence assigned to any regex-recognized value.
pub const MATCH_CONFIDENCE: f32 = 0.9;

/// Fields whose values carry decimals; everything else is matched as
/// an integer by construction of its capture group.
const DECIMAL_FIELDS: [&str; 4] = ["hba1c", "temperature", "creatinine", "hemoglobin"];

static FIELD_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        (
            "systolic_bp",
            Regex::new(r"(?i)(?:Systolic|SBP)[:\s]*(\d{2,3})").unwrap(),
        ),
        (
            "diastolic_bp",
            Regex::new(r"(?i)(?:Diastolic|DBP)[:\s]*(\d{2,3})").unwrap(),
        ),
        (
            "fasting_glucose",
            Regex::new(r"(?i)(?:Glucose|FBS|Fasting\s+Blood\s+Sugar)[:\s]*(\d{2,3})").unwrap(),
        ),
        (
            "hba1c",
            Regex::new(r"(?i)(?:HbA1c|A1C|Hemoglobin\s+A1C)[:\s]*(\d+\.?\d*)").unwrap(),
        ),
        (
            "total_cholesterol",
            Regex::new(r"(?i)(?:Total\s+Cholesterol|TC)[:\s]*(\d{2,3})").unwrap(),
        ),
        (
            "hdl_cholesterol",
            Regex::new(r"(?i)(?:HDL|HDL-C)[:\s]*(\d{2,3})").unwrap(),
        ),
        (
            "ldl_cholesterol",
            Regex::new(r"(?i)(?:LDL|LDL-C)[:\s]*(\d{2,3})").unwrap(),
        ),
        (
            "triglycerides",
            Regex::new(r"(?i)(?:Triglycerides|TG)[:\s]*(\d{2,4})").unwrap(),
        ),
        (
            "heart_rate",
            Regex::new(r"(?i)(?:Heart\s+Rate|HR|Pulse)[:\s]*(\d{2,3})").unwrap(),
        ),
        (
            "temperature",
            Regex::new(r"(?i)(?:Temperature|Temp)[:\s]*(\d{2,3}\.?\d*)").unwrap(),
        ),
        (
            "creatinine",
            Regex::new(r"(?i)(?:Creatinine|Cr)[:\s]*(\d+\.?\d*)").unwrap(),
        ),
        (
            "hemoglobin",
            Regex::new(r"(?i)(?:Hemoglobin|Hb|Hgb)[:\s]*(\d{1,2}\.?\d*)").unwrap(),
        ),
    ]
});

/// Composite form: "BP: 120/80", "Blood Pressure: 120 / 80 mmHg".
static BLOOD_PRESSURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:BP|Blood\s+Pressure)[:\s]*(\d{2,3})\s*/\s*(\d{2,3})").unwrap()
});

/// Standard unit reported for each recognized field.
pub fn unit_for(field: &str) -> &'static str {
    match field {
        "systolic_bp" | "diastolic_bp" => "mmHg",
        "fasting_glucose" | "total_cholesterol" | "hdl_cholesterol" | "ldl_cholesterol"
        | "triglycerides" | "creatinine" => "mg/dL",
        "hba1c" => "%",
        "heart_rate" => "bpm",
        "temperature" => "°C",
        "hemoglobin" => "g/dL",
        _ => "",
    }
}

/// Recognize all clinical fields in the extracted text.
pub fn parse_report_text(text: &str) -> BTreeMap<String, ExtractedField> {
    let lines: Vec<&str> = text.lines().collect();
    let mut fields = BTreeMap::new();

    for (name, pattern) in FIELD_PATTERNS.iter() {
        for line in &lines {
            if line.trim().is_empty() {
                continue;
            }
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let Some(value) = parse_value(name, &caps[1]) else {
                continue;
            };
            fields.insert(
                name.to_string(),
                ExtractedField {
                    value: normalize(name, value),
                    unit: unit_for(name).to_string(),
                    confidence: MATCH_CONFIDENCE,
                    raw_line: line.trim().to_string(),
                    note: None,
                },
            );
            break;
        }
    }

    // Composite blood pressure only fills the gaps the independent
    // patterns left.
    if !fields.contains_key("systolic_bp") || !fields.contains_key("diastolic_bp") {
        for line in &lines {
            let Some(caps) = BLOOD_PRESSURE.captures(line) else {
                continue;
            };
            for (name, group) in [("systolic_bp", 1), ("diastolic_bp", 2)] {
                if fields.contains_key(name) {
                    continue;
                }
                if let Ok(value) = caps[group].parse::<f64>() {
                    fields.insert(
                        name.to_string(),
                        ExtractedField {
                            value,
                            unit: "mmHg".to_string(),
                            confidence: MATCH_CONFIDENCE,
                            raw_line: line.trim().to_string(),
                            note: None,
                        },
                    );
                }
            }
            break;
        }
    }

    tracing::debug!(count = fields.len(), "Parsed medical values from text");
    fields
}

fn parse_value(field: &str, captured: &str) -> Option<f64> {
    if DECIMAL_FIELDS.contains(&field) {
        captured.parse::<f64>().ok()
    } else {
        // Integer fields: digit-only capture groups by construction.
        captured.parse::<i64>().ok().map(|v| v as f64)
    }
}

/// Unit corrections applied at parse time: Fahrenheit temperatures are
/// converted to Celsius, and HbA1c values mis-scaled by one decimal
/// are divided back down.
fn normalize(field: &str, value: f64) -> f64 {
    match field {
        "temperature" if value > 50.0 => ((value - 32.0) * 5.0 / 9.0 * 10.0).round() / 10.0,
        "hba1c" if value > 15.0 => value / 10.0,
        _ => value,
    }
}
