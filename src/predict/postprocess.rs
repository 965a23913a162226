//! Score post-processing: risk bands, recommendations, and the
//! simplified feature-importance attribution shown in the report UI.

use std::collections::BTreeMap;

use crate::models::assessment::AssessmentRecord;
use crate::models::enums::SmokingStatus;
use crate::models::prediction::{Priority, Recommendation, RiskCategory, RiskScores};

/// Band thresholds: [0,20) low, [20,50) moderate, [50,75) high,
/// [75,100] very high. Total over all inputs.
pub fn categorize(score: f64) -> RiskCategory {
    if score < 20.0 {
        RiskCategory::Low
    } else if score < 50.0 {
        RiskCategory::Moderate
    } else if score < 75.0 {
        RiskCategory::High
    } else {
        RiskCategory::VeryHigh
    }
}

fn priority_for(score: f64) -> Priority {
    if score >= 75.0 {
        Priority::High
    } else {
        Priority::Medium
    }
}

/// Condition-specific recommendations for any score ≥ 50, plus
/// unconditional lifestyle recommendations on cross-cutting signals.
pub fn build_recommendations(
    scores: &RiskScores,
    record: &AssessmentRecord,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if scores.heart_disease >= 50.0 {
        recommendations.push(Recommendation {
            category: "Cardiovascular".into(),
            priority: priority_for(scores.heart_disease),
            title: "Cardiovascular Health Assessment".into(),
            description: "Consider consulting a cardiologist for comprehensive heart health evaluation.".into(),
            actions: vec![
                "Schedule cardiology consultation".into(),
                "Monitor blood pressure regularly".into(),
                "Consider stress testing".into(),
            ],
        });
    }

    if scores.diabetes >= 50.0 {
        recommendations.push(Recommendation {
            category: "Endocrine".into(),
            priority: priority_for(scores.diabetes),
            title: "Diabetes Risk Management".into(),
            description: "Lifestyle modifications and glucose monitoring are recommended.".into(),
            actions: vec![
                "Consult endocrinologist".into(),
                "Implement diabetic diet".into(),
                "Monitor blood glucose levels".into(),
            ],
        });
    }

    if scores.cancer >= 50.0 {
        recommendations.push(Recommendation {
            category: "Oncology".into(),
            priority: priority_for(scores.cancer),
            title: "Cancer Screening".into(),
            description: "Elevated risk factors warrant age-appropriate cancer screening.".into(),
            actions: vec![
                "Discuss screening schedule with physician".into(),
                "Review family history with specialist".into(),
                "Eliminate tobacco exposure".into(),
            ],
        });
    }

    if scores.stroke >= 50.0 {
        recommendations.push(Recommendation {
            category: "Neurology".into(),
            priority: priority_for(scores.stroke),
            title: "Stroke Risk Reduction".into(),
            description: "Blood pressure and cardiovascular risk control reduce stroke likelihood.".into(),
            actions: vec![
                "Keep blood pressure within target range".into(),
                "Review anticoagulation need with physician".into(),
                "Adopt heart-healthy diet".into(),
            ],
        });
    }

    if record.number("bmi").unwrap_or(0.0) > 25.0 {
        recommendations.push(Recommendation {
            category: "Lifestyle".into(),
            priority: Priority::Medium,
            title: "Weight Management".into(),
            description: "Achieving a healthy weight can reduce multiple health risks.".into(),
            actions: vec![
                "Consult nutritionist".into(),
                "Increase physical activity".into(),
                "Monitor caloric intake".into(),
            ],
        });
    }

    let smoking = record
        .text("smoking_status")
        .and_then(SmokingStatus::from_str);
    if matches!(
        smoking,
        Some(SmokingStatus::Current) | Some(SmokingStatus::Former)
    ) {
        recommendations.push(Recommendation {
            category: "Lifestyle".into(),
            priority: Priority::High,
            title: "Smoking Cessation".into(),
            description: "Quitting smoking significantly reduces cardiovascular and cancer risks.".into(),
            actions: vec![
                "Join smoking cessation program".into(),
                "Consider nicotine replacement therapy".into(),
                "Seek behavioral support".into(),
            ],
        });
    }

    recommendations
}

/// Simplified, non-ML importance attribution: a fixed formula per
/// driver, each normalized to 0–100 for display.
pub fn feature_importance(record: &AssessmentRecord) -> BTreeMap<String, f64> {
    let mut importance = BTreeMap::new();

    let age = record.number("age").unwrap_or(0.0);
    importance.insert("age".to_string(), (age / 100.0).min(1.0) * 100.0);

    let systolic = record.number("systolic_bp").unwrap_or(0.0);
    importance.insert(
        "blood_pressure".to_string(),
        (systolic / 180.0).min(1.0) * 100.0,
    );

    let bmi = record.number("bmi").unwrap_or(0.0);
    importance.insert(
        "bmi".to_string(),
        ((bmi - 25.0).max(0.0) / 15.0).min(1.0) * 100.0,
    );

    let glucose = record.number("fasting_glucose").unwrap_or(0.0);
    importance.insert(
        "glucose".to_string(),
        ((glucose - 100.0).max(0.0) / 200.0).min(1.0) * 100.0,
    );

    importance
}
