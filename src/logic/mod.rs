//! Logic Module - Scoring & Trust Engines
//!
//! - `features/` - URL + markup feature extraction (50 full, 22 url-only)
//! - `model/` - Scaler, forest, neural scorer boundary, parameter store
//! - `threat/` - Hybrid fusion + evidence-based calibration
//! - `trust/` - Allow-list, session trust, base domain
//! - `pipeline` - extract → score → fuse → calibrate

pub mod config;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod threat;
pub mod trust;

pub use config::{EngineConfig, FusionStrategy, HybridConfig};
pub use pipeline::RiskPipeline;
