//! Loading and validation of the trained artifact set.
//!
//! The training job is an offline batch process; it writes three files
//! into the artifact directory and this module is the only consumer:
//!
//! - `health_risk_model.json`: weights plus architecture metadata
//! - `feature_scaler.json`: per-feature mean/std fitted on the
//!   training set
//! - `feature_names.json`: the feature ordering the scaler and model
//!   were fitted against
//!
//! A missing or inconsistent artifact is a load failure, never a
//! runtime failure: the predictor degrades to rule-based scoring.

use std::fs;
use std::path::Path;

use super::features;
use super::network::{NetworkSpec, RiskNetwork};
use super::scaler::FeatureScaler;
use super::PredictError;

pub const MODEL_FILE: &str = "health_risk_model.json";
pub const SCALER_FILE: &str = "feature_scaler.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";

/// Everything the model inference path needs, loaded once at startup
/// and read-only afterwards.
pub struct LoadedArtifacts {
    pub network: RiskNetwork,
    pub scaler: Option<FeatureScaler>,
    pub version: String,
}

/// Load and cross-validate the artifact set from `dir`.
pub fn load_artifacts(dir: &Path) -> Result<LoadedArtifacts, PredictError> {
    let spec: NetworkSpec = read_json(&dir.join(MODEL_FILE))?;

    if spec.input_size != features::FEATURE_COUNT {
        return Err(PredictError::ArtifactMismatch(format!(
            "model expects {} inputs, encoder produces {}",
            spec.input_size,
            features::FEATURE_COUNT
        )));
    }

    let network = RiskNetwork::from_spec(&spec)?;

    // The scaler is optional: without it the raw vector passes through.
    let scaler_path = dir.join(SCALER_FILE);
    let scaler = if scaler_path.exists() {
        let scaler: FeatureScaler = read_json(&scaler_path)?;
        scaler.validate(features::FEATURE_COUNT)?;
        Some(scaler)
    } else {
        tracing::warn!("no fitted scaler found, applying identity transform");
        None
    };

    // The ordering list must match the encoder exactly; a reordered
    // artifact silently mis-assigns every feature otherwise.
    let names_path = dir.join(FEATURE_NAMES_FILE);
    if names_path.exists() {
        let names: Vec<String> = read_json(&names_path)?;
        let expected = features::feature_names();
        if names != expected {
            return Err(PredictError::ArtifactMismatch(
                "feature_names.json does not match the encoder ordering".into(),
            ));
        }
    }

    tracing::info!(
        version = %spec.version,
        hidden = ?spec.hidden_sizes,
        scaled = scaler.is_some(),
        "Loaded health risk model"
    );

    Ok(LoadedArtifacts {
        network,
        scaler,
        version: spec.version,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, PredictError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::network::{HeadSpec, HeadsSpec, TrunkLayerSpec};

    fn write_model(dir: &Path, input_size: usize) {
        let width = 4;
        let layer = TrunkLayerSpec {
            weight: vec![vec![0.01; input_size]; width],
            bias: vec![0.0; width],
            bn_gamma: vec![1.0; width],
            bn_beta: vec![0.0; width],
            bn_mean: vec![0.0; width],
            bn_var: vec![1.0; width],
        };
        let head = HeadSpec {
            weight: vec![0.1; width],
            bias: 0.0,
        };
        let spec = NetworkSpec {
            version: "2.0.0".into(),
            input_size,
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
            dir.join(MODEL_FILE),
            serde_json::to_vec(&spec).unwrap(),
        )
        .unwrap();
    }

    fn write_scaler(dir: &Path, len: usize) {
        let scaler = FeatureScaler {
            mean: vec![0.0; len],
            std: vec![1.0; len],
        };
        fs::write(
            dir.join(SCALER_FILE),
            serde_json::to_vec(&scaler).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn loads_complete_artifact_set() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), features::FEATURE_COUNT);
        write_scaler(dir.path(), features::FEATURE_COUNT);
        fs::write(
            dir.path().join(FEATURE_NAMES_FILE),
            serde_json::to_vec(&features::feature_names()).unwrap(),
        )
        .unwrap();

        let artifacts = load_artifacts(dir.path()).unwrap();
        assert_eq!(artifacts.version, "2.0.0");
        assert_eq!(artifacts.network.input_size(), features::FEATURE_COUNT);
        assert!(artifacts.scaler.is_some());
    }

    #[test]
    fn missing_model_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_artifacts(dir.path()),
            Err(PredictError::Io(_))
        ));
    }

    #[test]
    fn wrong_input_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), 12);
        assert!(matches!(
            load_artifacts(dir.path()),
            Err(PredictError::ArtifactMismatch(_))
        ));
    }

    #[test]
    fn missing_scaler_degrades_to_identity() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), features::FEATURE_COUNT);
        let artifacts = load_artifacts(dir.path()).unwrap();
        assert!(artifacts.scaler.is_none());
    }

    #[test]
    fn reordered_feature_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), features::FEATURE_COUNT);
        let mut names = features::feature_names();
        names.swap(0, 1);
        fs::write(
            dir.path().join(FEATURE_NAMES_FILE),
            serde_json::to_vec(&names).unwrap(),
        )
        .unwrap();
        assert!(matches!(
            load_artifacts(dir.path()),
            Err(PredictError::ArtifactMismatch(_))
        ));
    }

    #[test]
    fn malformed_model_json_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MODEL_FILE), b"{not json").unwrap();
        assert!(matches!(
            load_artifacts(dir.path()),
            Err(PredictError::ArtifactFormat(_))
        ));
    }
}
