pub mod config;
pub mod extraction;
pub mod models;
pub mod predict;

use tracing_subscriber::EnvFilter;

pub use models::assessment::AssessmentRecord;
pub use models::prediction::PredictionResult;
pub use predict::predictor::RiskPredictor;

/// Initialize tracing for host binaries.
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
