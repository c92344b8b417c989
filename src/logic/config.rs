//! Engine Configuration
//!
//! Fixed at startup, never mutated per request.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;

// ============================================================================
// HYBRID CONFIG
// ============================================================================

/// How the two scorers are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionStrategy {
    WeightedAverage,
}

impl FusionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionStrategy::WeightedAverage => "weighted_average",
        }
    }
}

/// Fusion setup shared by every request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HybridConfig {
    pub strategy: FusionStrategy,
    /// Disable to score with the neural path alone
    pub rf_enabled: bool,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            strategy: FusionStrategy::WeightedAverage,
            rf_enabled: true,
        }
    }
}

impl HybridConfig {
    /// Neural path only
    pub fn lr_only() -> Self {
        Self {
            rf_enabled: false,
            ..Default::default()
        }
    }
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Where parameter blobs live and how a scan is bounded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub model_dir: PathBuf,
    pub forest_file: String,
    pub scaler_file: String,
    pub neural_file: String,
    /// Expected SHA-256 (hex) per blob; `None` skips verification
    pub forest_sha256: Option<String>,
    pub scaler_sha256: Option<String>,
    pub neural_sha256: Option<String>,
    pub hybrid: HybridConfig,
    pub scan_timeout_secs: u64,
    pub content_min_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_dir: constants::default_model_dir(),
            forest_file: constants::DEFAULT_FOREST_FILE.to_string(),
            scaler_file: constants::DEFAULT_SCALER_FILE.to_string(),
            neural_file: constants::DEFAULT_NEURAL_FILE.to_string(),
            forest_sha256: None,
            scaler_sha256: None,
            neural_sha256: None,
            hybrid: HybridConfig::default(),
            scan_timeout_secs: constants::DEFAULT_SCAN_TIMEOUT_SECS,
            content_min_len: constants::DEFAULT_CONTENT_MIN_LEN,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            model_dir: constants::get_model_dir(),
            hybrid: HybridConfig {
                rf_enabled: constants::is_forest_enabled(),
                ..Default::default()
            },
            scan_timeout_secs: constants::get_scan_timeout(),
            ..Default::default()
        }
    }

    /// Config rooted at an explicit model directory
    pub fn with_model_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: dir.into(),
            ..Default::default()
        }
    }

    pub fn forest_path(&self) -> PathBuf {
        self.model_dir.join(&self.forest_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.model_dir.join(&self.scaler_file)
    }

    pub fn neural_path(&self) -> PathBuf {
        self.model_dir.join(&self.neural_file)
    }
}

// ============================================================================
// TESTS
// ============================================================================
