use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "VitalScore";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/VitalScore/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("VitalScore")
}

/// Directory holding the trained model artifact set
/// (model weights, fitted scaler, feature ordering).
pub fn models_dir() -> PathBuf {
    app_data_dir().join("ml_models")
}
