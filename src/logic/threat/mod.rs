//! Threat Module
//!
//! Turns the two scorer outputs into one calibrated risk score.
//!
//! ## Structure
//! - `types`: RiskBand, fusion/calibration results, ScanReport
//! - `rules`: Weights, regimes, lookup tables
//! - `fusion`: Neural + forest reconciliation
//! - `calibration`: URL-evidence adjustment and clamping
//!
//! ## Usage
//! ```ignore
//! use crate::logic::threat::{fuse, calibrate, RiskBand};
//!
//! let fused = fuse(lr_score, forest.as_ref(), &hybrid);
//! let score = calibrate(fused.score, url);
//! match RiskBand::from_score(score) {
//!     RiskBand::Safe => println!("Proceed"),
//!     RiskBand::Warning => println!("Caution"),
//!     RiskBand::Phishing => println!("Block"),
//! }
//! ```

pub mod calibration;
pub mod fusion;
pub mod rules;
pub mod types;

// Re-export main types for convenience
pub use types::{
    to_percentage,
    CalibrationBreakdown,
    CalibrationRegime,
    FusionDecision,
    FusionOutcome,
    RiskBand,
    ScanReport,
    UrlIndicators,
};

pub use rules::{PatternType, CALIBRATED_MAX, CALIBRATED_MIN, DECISION_THRESHOLD};

pub use calibration::{calibrate, calibrate_detailed, detect_pattern, tld_trust_bonus};
pub use fusion::fuse;
