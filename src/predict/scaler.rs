use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::PredictError;

/// Per-feature standardization fitted offline by the training job.
///
/// Applied identically at train and inference time; never fit here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl FeatureScaler {
    /// `(x - mean_i) / std_i` per component. A zero-variance component
    /// passes through unscaled so a degenerate artifact cannot poison
    /// the whole vector.
    pub fn transform(&self, features: &Array1<f32>) -> Array1<f32> {
        Array1::from_iter(features.iter().enumerate().map(|(i, &x)| {
            let std = self.std[i];
            if std > f32::EPSILON {
                (x - self.mean[i]) / std
            } else {
                x
            }
        }))
    }

    pub fn validate(&self, expected_len: usize) -> Result<(), PredictError> {
        if self.mean.len() != expected_len || self.std.len() != expected_len {
            return Err(PredictError::ArtifactMismatch(format!(
                "scaler has {} mean / {} std components, expected {}",
                self.mean.len(),
                self.std.len(),
                expected_len
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn transform_standardizes_components() {
        let scaler = FeatureScaler {
            mean: vec![10.0, 0.0],
            std: vec![2.0, 4.0],
        };
        let out = scaler.transform(&array![14.0, -8.0]);
        assert_eq!(out, array![2.0, -2.0]);
    }

    #[test]
    fn zero_std_component_passes_through() {
        let scaler = FeatureScaler {
            mean: vec![5.0],
            std: vec![0.0],
        };
        let out = scaler.transform(&array![3.0]);
        assert_eq!(out[0], 3.0);
    }

    #[test]
    fn validate_rejects_wrong_length() {
        let scaler = FeatureScaler {
            mean: vec![0.0; 3],
            std: vec![1.0; 3],
        };
        assert!(scaler.validate(3).is_ok());
        assert!(matches!(
            scaler.validate(30),
            Err(PredictError::ArtifactMismatch(_))
        ));
    }
}
