//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change where parameter blobs are read from, only edit this file
//! (or set the matching environment variable).

/// Forest parameter blob file name
pub const DEFAULT_FOREST_FILE: &str = "rf_model.json";

/// Scaler parameter blob file name
pub const DEFAULT_SCALER_FILE: &str = "scaler_params.json";

/// Neural scorer weights file name
pub const DEFAULT_NEURAL_FILE: &str = "model.onnx";

/// Default whole-scan timeout (seconds)
pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 15;

/// Markup shorter than this is treated as "content unavailable"
pub const DEFAULT_CONTENT_MIN_LEN: usize = 100;

/// Marker appended by the scan page once the user chose to proceed
pub const VERIFIED_MARKER: &str = "guardnet-verified";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "phish-scan";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model directory from environment or use default
pub fn get_model_dir() -> std::path::PathBuf {
    std::env::var("PHISH_SCAN_MODEL_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_model_dir())
}

/// `<data dir>/phish-scan/models`, or `./models` when no data dir exists
pub fn default_model_dir() -> std::path::PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_NAME).join("models"))
        .unwrap_or_else(|| std::path::PathBuf::from("models"))
}

/// Check if the forest path is enabled
pub fn is_forest_enabled() -> bool {
    std::env::var("PHISH_SCAN_RF_ENABLED")
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(true)
}

/// Get scan timeout from environment or use default
pub fn get_scan_timeout() -> u64 {
    std::env::var("PHISH_SCAN_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SCAN_TIMEOUT_SECS)
}
