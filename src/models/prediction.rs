use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Risk band derived from a 0–100 score by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Low => "low",
            RiskCategory::Moderate => "moderate",
            RiskCategory::High => "high",
            RiskCategory::VeryHigh => "very_high",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One 0–100 risk score per tracked condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskScores {
    pub heart_disease: f64,
    pub diabetes: f64,
    pub cancer: f64,
    pub stroke: f64,
}

impl RiskScores {
    /// Clamp every score into [0, 100].
    pub fn clamped(self) -> Self {
        Self {
            heart_disease: self.heart_disease.clamp(0.0, 100.0),
            diabetes: self.diabetes.clamp(0.0, 100.0),
            cancer: self.cancer.clamp(0.0, 100.0),
            stroke: self.stroke.clamp(0.0, 100.0),
        }
    }

    pub fn all_finite(&self) -> bool {
        self.heart_disease.is_finite()
            && self.diabetes.is_finite()
            && self.cancer.is_finite()
            && self.stroke.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Medium,
    High,
}

/// A personalized follow-up suggestion attached to a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub actions: Vec<String>,
}

/// The uniform result envelope returned for every prediction request.
///
/// Constructed fresh per request and never mutated afterwards. Field
/// names are the external API contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub heart_disease_risk: f64,
    pub diabetes_risk: f64,
    pub cancer_risk: f64,
    pub stroke_risk: f64,
    pub heart_disease_category: RiskCategory,
    pub diabetes_category: RiskCategory,
    pub cancer_category: RiskCategory,
    pub stroke_category: RiskCategory,
    pub prediction_confidence: f64,
    pub prediction_method: String,
    pub model_version: String,
    pub prediction_time_ms: f64,
    pub recommendations: Vec<Recommendation>,
    pub feature_importance: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl PredictionResult {
    /// The fixed fail-open envelope: a prediction must always render,
    /// so any internal failure is replaced with neutral moderate
    /// scores and an explicit error marker.
    pub fn error_fallback() -> Self {
        Self {
            heart_disease_risk: 25.0,
            diabetes_risk: 25.0,
            cancer_risk: 25.0,
            stroke_risk: 25.0,
            heart_disease_category: RiskCategory::Moderate,
            diabetes_category: RiskCategory::Moderate,
            cancer_category: RiskCategory::Moderate,
            stroke_category: RiskCategory::Moderate,
            prediction_confidence: 0.5,
            prediction_method: "error-fallback".to_string(),
            model_version: "error-fallback".to_string(),
            prediction_time_ms: 0.0,
            recommendations: Vec::new(),
            feature_importance: BTreeMap::new(),
            error: true,
        }
    }
}
