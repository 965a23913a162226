//! Deterministic rule-based fallback scorer.
//!
//! Used when no trained artifact is available. Each condition
//! accumulates points from fixed threshold bands and is capped at 100;
//! stroke is derived from the heart-disease and diabetes scores rather
//! than accumulated independently. The thresholds are a stable contract
//! with the assessment UI and must not drift.

use crate::models::assessment::AssessmentRecord;
use crate::models::enums::SmokingStatus;
use crate::models::prediction::RiskScores;

pub const RULE_BASED_CONFIDENCE: f64 = 0.75;

pub fn rule_based_scores(record: &AssessmentRecord) -> RiskScores {
    let age = record.number("age").unwrap_or(0.0);
    let systolic = record.number("systolic_bp").unwrap_or(0.0);
    let diastolic = record.number("diastolic_bp").unwrap_or(0.0);
    let smoking = record
        .text("smoking_status")
        .and_then(SmokingStatus::from_str);

    let mut heart: f64 = 0.0;
    if age > 65.0 {
        heart += 15.0;
    } else if age > 45.0 {
        heart += 8.0;
    }
    if systolic > 140.0 || diastolic > 90.0 {
        heart += 20.0;
    } else if systolic > 130.0 || diastolic > 80.0 {
        heart += 10.0;
    }
    let cholesterol = record.number("total_cholesterol").unwrap_or(0.0);
    if cholesterol > 240.0 {
        heart += 15.0;
    } else if cholesterol > 200.0 {
        heart += 8.0;
    }
    match smoking {
        Some(SmokingStatus::Current) => heart += 25.0,
        Some(SmokingStatus::Former) => heart += 10.0,
        _ => {}
    }
    if record.flag("chest_pain") || record.flag("shortness_of_breath") {
        heart += 20.0;
    }

    let mut diabetes: f64 = 0.0;
    let glucose = record.number("fasting_glucose").unwrap_or(0.0);
    if glucose > 126.0 {
        diabetes += 30.0;
    } else if glucose > 100.0 {
        diabetes += 15.0;
    }
    let hba1c = record.number("hba1c").unwrap_or(0.0);
    if hba1c > 6.5 {
        diabetes += 25.0;
    } else if hba1c > 5.7 {
        diabetes += 12.0;
    }
    let bmi = record.number("bmi").unwrap_or(0.0);
    if bmi > 30.0 {
        diabetes += 20.0;
    } else if bmi > 25.0 {
        diabetes += 10.0;
    }
    if record.flag("frequent_urination") || record.flag("excessive_thirst") {
        diabetes += 15.0;
    }

    let mut cancer: f64 = 0.0;
    if age > 60.0 {
        cancer += 15.0;
    } else if age > 40.0 {
        cancer += 8.0;
    }
    match smoking {
        Some(SmokingStatus::Current) => cancer += 35.0,
        Some(SmokingStatus::Former) => cancer += 15.0,
        _ => {}
    }
    if record.family_history().includes_cancer() {
        cancer += 20.0;
    }

    let heart = heart.min(100.0);
    let diabetes = diabetes.min(100.0);

    RiskScores {
        heart_disease: heart,
        diabetes,
        cancer: cancer.min(100.0),
        stroke: (heart * 0.7).max(diabetes * 0.6).min(100.0),
    }
}
