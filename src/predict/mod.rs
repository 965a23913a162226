pub mod artifact;
pub mod features;
pub mod network;
pub mod postprocess;
pub mod predictor;
pub mod rules;
pub mod scaler;

pub use artifact::LoadedArtifacts;
pub use network::{HeadOutputs, RiskNetwork};
pub use predictor::RiskPredictor;
pub use scaler::FeatureScaler;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Artifact format error: {0}")]
    ArtifactFormat(#[from] serde_json::Error),

    #[error("Artifact mismatch: {0}")]
    ArtifactMismatch(String),

    #[error("Non-finite model output for {0}")]
    NonFiniteOutput(&'static str),
}
