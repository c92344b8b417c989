//! Inference Engine - neural scorer boundary
//!
//! The neural scorer maps a standardized full-layout vector to
//! P(legitimate). It is consumed through [`NeuralScorer`] so the pipeline
//! can run against ONNX weights or any other implementation.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};

// ============================================================================
// SCORER TRAIT
// ============================================================================

/// Trait cho neural scorers (ONNX, remote, stub)
#[async_trait]
pub trait NeuralScorer: Send + Sync {
    /// P(legitimate) for a standardized 50-slot vector
    async fn predict_legit(&self, features: &[f64]) -> ScanResult<f64>;

    /// Short name for logs and status
    fn name(&self) -> &str {
        "neural"
    }
}

/// Reject anything that is not a probability
pub fn check_probability(value: f64) -> ScanResult<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ScanError::ScoringFailure(format!(
            "neural scorer returned {} (expected a probability)",
            value
        )))
    }
}

// ============================================================================
// STATS
// ============================================================================

/// Latency/count accounting for the neural path
#[derive(Debug, Default)]
pub struct InferenceStats {
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl InferenceStats {
    pub fn record(&self, elapsed_us: u64) {
        self.latency_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.inference_count.load(Ordering::Relaxed)
    }

    pub fn avg_latency_ms(&self) -> f32 {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.count();
        if count > 0 {
            (sum as f32 / count as f32) / 1000.0
        } else {
            0.0
        }
    }
}

/// Engine Status for callers/diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub forest_trees: usize,
    pub scaler_loaded: bool,
    pub rf_enabled: bool,
    pub feature_version: u8,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

#[cfg(feature = "onnx")]
pub use onnx::OnnxScorer;

#[cfg(feature = "onnx")]
mod onnx {
    use async_trait::async_trait;
    use ndarray::Array2;
    use ort::session::{builder::GraphOptimizationLevel, Session};
    use ort::value::Value;
    use parking_lot::Mutex;

    use super::NeuralScorer;
    use crate::error::{ScanError, ScanResult};
    use crate::logic::features::FULL_FEATURE_COUNT;

    /// ONNX Runtime session over the neural weights
    pub struct OnnxScorer {
        session: Mutex<Session>,
        output_name: String,
    }

    fn failure(context: &str, e: impl std::fmt::Display) -> ScanError {
        ScanError::ModelUnavailable(format!("{}: {}", context, e))
    }

    impl OnnxScorer {
        /// Load ONNX weights from memory
        pub fn from_bytes(model_bytes: &[u8]) -> ScanResult<Self> {
            log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

            let session = Session::builder()
                .map_err(|e| failure("Session builder error", e))?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .map_err(|e| failure("Optimization error", e))?
                .commit_from_memory(model_bytes)
                .map_err(|e| failure("Load from memory error", e))?;

            Self::with_session(session)
        }

        fn with_session(session: Session) -> ScanResult<Self> {
            let output_name = session
                .outputs
                .first()
                .map(|o| o.name.clone())
                .ok_or_else(|| ScanError::ModelUnavailable("No output defined".to_string()))?;

            log::info!("ONNX model loaded successfully (output: {})", output_name);

            Ok(Self {
                session: Mutex::new(session),
                output_name,
            })
        }

        fn run(&self, features: &[f64]) -> ScanResult<f64> {
            if features.len() != FULL_FEATURE_COUNT {
                return Err(ScanError::ScoringFailure(format!(
                    "expected {} features, got {}",
                    FULL_FEATURE_COUNT,
                    features.len()
                )));
            }

            let input: Vec<f32> = features.iter().map(|&v| v as f32).collect();
            let input_array = Array2::<f32>::from_shape_vec((1, FULL_FEATURE_COUNT), input)
                .map_err(|e| ScanError::ScoringFailure(format!("Array error: {}", e)))?;

            let input_tensor = Value::from_array(input_array)
                .map_err(|e| ScanError::ScoringFailure(format!("Tensor error: {}", e)))?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![input_tensor])
                .map_err(|e| ScanError::ScoringFailure(format!("Inference failed: {}", e)))?;

            let output = outputs
                .get(&self.output_name)
                .ok_or_else(|| ScanError::ScoringFailure("No output".to_string()))?;

            let output_tensor = output
                .try_extract_tensor::<f32>()
                .map_err(|e| ScanError::ScoringFailure(format!("Extract error: {}", e)))?;

            output_tensor
                .1
                .first()
                .map(|&v| v as f64)
                .ok_or_else(|| ScanError::ScoringFailure("Empty output tensor".to_string()))
        }
    }

    #[async_trait]
    impl NeuralScorer for OnnxScorer {
        async fn predict_legit(&self, features: &[f64]) -> ScanResult<f64> {
            self.run(features)
        }

        fn name(&self) -> &str {
            "onnx"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_probability() {
        assert_eq!(check_probability(0.25).unwrap(), 0.25);
        assert!(check_probability(1.5).is_err());
        assert!(check_probability(-0.1).is_err());
        assert!(matches!(
            check_probability(f64::NAN),
            Err(ScanError::ScoringFailure(_))
        ));
    }

    #[test]
    fn test_inference_stats() {
        let stats = InferenceStats::default();
        assert_eq!(stats.avg_latency_ms(), 0.0);
        stats.record(2000);
        stats.record(4000);
        assert_eq!(stats.count(), 2);
        assert!((stats.avg_latency_ms() - 3.0).abs() < 1e-6);
    }
}
