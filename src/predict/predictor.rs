//! The prediction façade.
//!
//! One `RiskPredictor` is constructed at service startup and shared
//! read-only across requests. Artifact availability is decided once at
//! load: either the trained network (with its paired scaler) or the
//! rule-based scorer serves every prediction for the process lifetime.
//!
//! `predict` is fail-open: the caller is a user-facing health workflow
//! that must always render a result, so any internal failure is
//! replaced by the fixed error envelope instead of propagating.

use std::path::Path;
use std::time::Instant;

use serde_json::Value;

use crate::models::assessment::AssessmentRecord;
use crate::models::prediction::{PredictionResult, RiskScores};

use super::artifact::{self, LoadedArtifacts};
use super::network::RiskNetwork;
use super::scaler::FeatureScaler;
use super::{features, postprocess, rules, PredictError};

const MODEL_CONFIDENCE: f64 = 0.85;

enum Backend {
    Model {
        network: RiskNetwork,
        scaler: Option<FeatureScaler>,
        version: String,
    },
    RuleBased,
}

pub struct RiskPredictor {
    backend: Backend,
}

impl RiskPredictor {
    /// Load the trained artifact set, falling back to rule-based
    /// scoring when it is missing or invalid. Never fails the host:
    /// the service stays available with no trained model.
    pub fn load(artifact_dir: &Path) -> Self {
        match artifact::load_artifacts(artifact_dir) {
            Ok(LoadedArtifacts {
                network,
                scaler,
                version,
            }) => Self {
                backend: Backend::Model {
                    network,
                    scaler,
                    version,
                },
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "No usable model artifact, scoring rule-based for the process lifetime"
                );
                Self::rule_based()
            }
        }
    }

    /// A predictor that always uses the rule-based scorer.
    pub fn rule_based() -> Self {
        Self {
            backend: Backend::RuleBased,
        }
    }

    pub fn has_model(&self) -> bool {
        matches!(self.backend, Backend::Model { .. })
    }

    /// Raw-payload entry point for API callers. A payload that is not
    /// a JSON object cannot be assessed and yields the error envelope.
    pub fn predict_payload(&self, payload: &Value) -> PredictionResult {
        match payload {
            Value::Object(map) => {
                self.predict(&AssessmentRecord::from_value(Value::Object(map.clone())))
            }
            other => {
                tracing::error!(
                    payload_type = json_type(other),
                    "Prediction payload is not an object, returning error fallback"
                );
                PredictionResult::error_fallback()
            }
        }
    }

    /// Score one assessment. Never panics and never returns an error:
    /// failures become the fixed error envelope with `error: true`.
    pub fn predict(&self, record: &AssessmentRecord) -> PredictionResult {
        let started = Instant::now();
        let scored = self.score(record);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        match scored {
            Ok((scores, confidence, method, version)) => PredictionResult {
                heart_disease_risk: scores.heart_disease,
                diabetes_risk: scores.diabetes,
                cancer_risk: scores.cancer,
                stroke_risk: scores.stroke,
                heart_disease_category: postprocess::categorize(scores.heart_disease),
                diabetes_category: postprocess::categorize(scores.diabetes),
                cancer_category: postprocess::categorize(scores.cancer),
                stroke_category: postprocess::categorize(scores.stroke),
                prediction_confidence: confidence,
                prediction_method: method.to_string(),
                model_version: version,
                prediction_time_ms: elapsed_ms,
                recommendations: postprocess::build_recommendations(&scores, record),
                feature_importance: postprocess::feature_importance(record),
                error: false,
            },
            Err(e) => {
                tracing::error!(error = %e, "Prediction failed, returning error fallback");
                PredictionResult::error_fallback()
            }
        }
    }

    fn score(
        &self,
        record: &AssessmentRecord,
    ) -> Result<(RiskScores, f64, &'static str, String), PredictError> {
        match &self.backend {
            Backend::Model {
                network,
                scaler,
                version,
            } => {
                let vector = features::encode(record);
                let vector = match scaler {
                    Some(scaler) => scaler.transform(&vector),
                    None => vector,
                };
                let out = network.infer(&vector);
                let scores = RiskScores {
                    heart_disease: f64::from(out.heart_disease) * 100.0,
                    diabetes: f64::from(out.diabetes) * 100.0,
                    cancer: f64::from(out.cancer) * 100.0,
                    stroke: f64::from(out.stroke) * 100.0,
                };
                if !scores.all_finite() {
                    return Err(PredictError::NonFiniteOutput("risk head"));
                }
                Ok((scores.clamped(), MODEL_CONFIDENCE, "model", version.clone()))
            }
            Backend::RuleBased => Ok((
                rules::rule_based_scores(record).clamped(),
                rules::RULE_BASED_CONFIDENCE,
                "rule-based",
                "rule-based".to_string(),
            )),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prediction::RiskCategory;
    use crate::predict::network::{HeadSpec, HeadsSpec, NetworkSpec, TrunkLayerSpec};
    use serde_json::json;
    use std::fs;

    fn reference_record() -> AssessmentRecord {
        let mut rec = AssessmentRecord::new();
        rec.set("age", 70)
            .set("systolic_bp", 150)
            .set("diastolic_bp", 95)
            .set("total_cholesterol", 250)
            .set("smoking_status", "current")
            .set("chest_pain", true);
        rec
    }

    #[test]
    fn rule_based_predictor_matches_reference_scores() {
        let predictor = RiskPredictor::rule_based();
        let result = predictor.predict(&reference_record());
        assert_eq!(result.heart_disease_risk, 95.0);
        assert_eq!(result.heart_disease_category, RiskCategory::VeryHigh);
        assert_eq!(result.prediction_confidence, 0.75);
        assert_eq!(result.prediction_method, "rule-based");
        assert_eq!(result.model_version, "rule-based");
        assert!(!result.error);
        assert!(result.prediction_time_ms >= 0.0);
    }

    #[test]
    fn high_risk_scores_produce_recommendations() {
        let predictor = RiskPredictor::rule_based();
        let result = predictor.predict(&reference_record());
        // Heart score 95 → cardiovascular (high) + smoking cessation.
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.category == "Cardiovascular"));
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.title == "Smoking Cessation"));
    }

    #[test]
    fn prediction_is_idempotent() {
        let predictor = RiskPredictor::rule_based();
        let record = reference_record();
        let a = predictor.predict(&record);
        let b = predictor.predict(&record);
        assert_eq!(a.heart_disease_risk, b.heart_disease_risk);
        assert_eq!(a.diabetes_risk, b.diabetes_risk);
        assert_eq!(a.cancer_risk, b.cancer_risk);
        assert_eq!(a.stroke_risk, b.stroke_risk);
        assert_eq!(a.heart_disease_category, b.heart_disease_category);
        assert_eq!(a.recommendations.len(), b.recommendations.len());
    }

    #[test]
    fn empty_record_predicts_low_across_the_board() {
        let predictor = RiskPredictor::rule_based();
        let result = predictor.predict(&AssessmentRecord::new());
        assert_eq!(result.heart_disease_risk, 0.0);
        assert_eq!(result.heart_disease_category, RiskCategory::Low);
        assert!(!result.error);
    }

    #[test]
    fn garbage_payload_yields_error_envelope() {
        let predictor = RiskPredictor::rule_based();
        for payload in [json!(null), json!("garbage"), json!([1, 2]), json!(42)] {
            let result = predictor.predict_payload(&payload);
            assert!(result.error);
            assert_eq!(result.heart_disease_risk, 25.0);
            assert_eq!(result.diabetes_category, RiskCategory::Moderate);
            assert_eq!(result.prediction_method, "error-fallback");
        }
    }

    #[test]
    fn object_payload_is_predicted_normally() {
        let predictor = RiskPredictor::rule_based();
        let result = predictor.predict_payload(&json!({"age": 70}));
        assert!(!result.error);
        assert_eq!(result.heart_disease_risk, 15.0);
    }

    #[test]
    fn missing_artifact_dir_loads_rule_based() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = RiskPredictor::load(&dir.path().join("nowhere"));
        assert!(!predictor.has_model());
    }

    /// Model whose trunk zeroes every activation and whose head
    /// weights overflow f32 when loaded (1e39 is a finite JSON number
    /// but casts to infinity): `inf * 0.0` produces NaN at the heads,
    /// which must be trapped into the error envelope, not surfaced.
    fn write_poisoned_artifact(dir: &Path) {
        let zeros = vec![0.0; crate::predict::features::FEATURE_COUNT];
        let head = json!({"weight": [1e39, 1e39], "bias": 0.0});
        let spec = json!({
            "version": "9.9.9",
            "input_size": crate::predict::features::FEATURE_COUNT,
            "hidden_sizes": [2],
            "dropout_rate": 0.3,
            "trunk": [{
                "weight": [zeros.clone(), zeros],
                "bias": [0.0, 0.0],
                "bn_gamma": [1.0, 1.0],
                "bn_beta": [0.0, 0.0],
                "bn_mean": [0.0, 0.0],
                "bn_var": [1.0, 1.0],
            }],
            "heads": {
                "heart_disease": head.clone(),
                "diabetes": head.clone(),
                "cancer": head.clone(),
                "stroke": head,
            },
        });
        fs::write(
            dir.join(artifact::MODEL_FILE),
            serde_json::to_vec(&spec).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn non_finite_model_output_is_contained() {
        let dir = tempfile::tempdir().unwrap();
        write_poisoned_artifact(dir.path());
        let predictor = RiskPredictor::load(dir.path());
        assert!(predictor.has_model());

        let result = predictor.predict(&AssessmentRecord::new());
        assert!(result.error);
        assert_eq!(result.prediction_method, "error-fallback");
        assert_eq!(result.heart_disease_risk, 25.0);
    }

    #[test]
    fn model_path_reports_artifact_version_and_confidence() {
        // A benign artifact: zero trunk, zero heads → sigmoid(0) = 0.5
        // → every risk exactly 50.
        let dir = tempfile::tempdir().unwrap();
        let width = 2;
        let layer = TrunkLayerSpec {
            weight: vec![vec![0.0; crate::predict::features::FEATURE_COUNT]; width],
            bias: vec![0.0; width],
            bn_gamma: vec![1.0; width],
            bn_beta: vec![0.0; width],
            bn_mean: vec![0.0; width],
            bn_var: vec![1.0; width],
        };
        let head = HeadSpec {
            weight: vec![0.0; width],
            bias: 0.0,
        };
        let spec = NetworkSpec {
            version: "2.0.0".into(),
            input_size: crate::predict::features::FEATURE_COUNT,
            hidden_sizes: vec![width],
            dropout_rate: 0.3,
            trunk: vec![layer],
            heads: HeadsSpec {
                heart_disease: head.clone(),
                diabetes: head.clone(),
                cancer: head.clone(),
                stroke: head,
            },
        };
        fs::write(
            dir.path().join(artifact::MODEL_FILE),
            serde_json::to_vec(&spec).unwrap(),
        )
        .unwrap();

        let predictor = RiskPredictor::load(dir.path());
        assert!(predictor.has_model());
        let result = predictor.predict(&AssessmentRecord::new());
        assert!(!result.error);
        assert_eq!(result.prediction_method, "model");
        assert_eq!(result.model_version, "2.0.0");
        assert_eq!(result.prediction_confidence, 0.85);
        assert_eq!(result.heart_disease_risk, 50.0);
        assert_eq!(result.stroke_category, RiskCategory::High);
    }
}
