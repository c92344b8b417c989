//! Phish Scan Core
//!
//! Client-side phishing risk scoring: URL + markup features, a neural
//! scorer fused with a decision-tree ensemble, evidence-based calibration,
//! and the domain trust rules that decide what is never scanned.

pub mod api;
pub mod constants;
pub mod error;
pub mod logic;

pub use api::ScanService;
pub use error::{ScanError, ScanResult};
pub use logic::config::{EngineConfig, HybridConfig};
pub use logic::model::NeuralScorer;
pub use logic::threat::{RiskBand, ScanReport};
