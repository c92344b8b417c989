//! Model Module - scorers and their parameters
//!
//! Scaler + neural boundary for the full layout, decision forest for the
//! URL-only layout, and the memoized store that loads all three.

pub mod forest;
pub mod inference;
pub mod scaler;
pub mod store;

// Re-export common types
pub use forest::{DecisionTreeNode, ForestPrediction, LeafValue, RandomForestModel, VotingStats};
pub use inference::{check_probability, EngineStatus, InferenceStats, NeuralScorer};
#[cfg(feature = "onnx")]
pub use inference::OnnxScorer;
pub use scaler::{normalize, ScalerParams};
pub use store::{AuxModels, ModelStore};
