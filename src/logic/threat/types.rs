//! Threat Types
//!
//! Data structures produced by fusion, calibration, and banding.
//! KHÔNG chứa logic scoring - chỉ data structures.

use serde::{Deserialize, Serialize};

use super::rules::PatternType;
use crate::logic::model::ForestPrediction;

// ============================================================================
// RISK BAND
// ============================================================================

/// Caller-facing verdict derived from the calibrated score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Safe,
    Warning,
    Phishing,
}

impl RiskBand {
    /// Upper bound (inclusive, percent) of the safe band
    pub const SAFE_MAX_PCT: u32 = 25;
    /// Upper bound (inclusive, percent) of the warning band
    pub const WARNING_MAX_PCT: u32 = 50;

    /// Band from a score in [0,1], compared as a rounded percentage
    pub fn from_score(score: f64) -> Self {
        Self::from_percentage(to_percentage(score))
    }

    pub fn from_percentage(pct: u32) -> Self {
        if pct <= Self::SAFE_MAX_PCT {
            RiskBand::Safe
        } else if pct <= Self::WARNING_MAX_PCT {
            RiskBand::Warning
        } else {
            RiskBand::Phishing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Safe => "safe",
            RiskBand::Warning => "warning",
            RiskBand::Phishing => "phishing",
        }
    }

}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `round(score * 100)`, clamped to 0..=100
pub fn to_percentage(score: f64) -> u32 {
    if !score.is_finite() {
        return 0;
    }
    (score * 100.0).round().clamp(0.0, 100.0) as u32
}

// ============================================================================
// FUSION
// ============================================================================

/// Which fusion branch produced the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionDecision {
    Agreed,
    DisagreedFavorLr,
    DisagreedTrustLr,
    LrOnly,
}

impl FusionDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionDecision::Agreed => "agreed",
            FusionDecision::DisagreedFavorLr => "disagreed_favor_lr",
            FusionDecision::DisagreedTrustLr => "disagreed_trust_lr",
            FusionDecision::LrOnly => "lr_only",
        }
    }
}

/// Fused score plus how it was reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionOutcome {
    pub score: f64,
    pub decision: FusionDecision,
    /// Neural share of the weighted average (1.0 when lr-only)
    pub lr_weight: f64,
    /// `|lr - 0.5| * 2`, diagnostic only
    pub lr_confidence: f64,
}

// ============================================================================
// CALIBRATION
// ============================================================================

/// Structural URL evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UrlIndicators {
    pub is_https: bool,
    pub has_common_tld: bool,
    pub has_ip_address: bool,
    pub has_deep_subdomain: bool,
    pub has_free_hosting: bool,
    pub is_long_url: bool,
    pub has_many_digits: bool,
    pub is_standard_http: bool,
    pub is_suspicious_https: bool,
}

/// Mutually exclusive calibration regimes, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationRegime {
    /// IP-literal or free-hosting host
    StrongPhishingIndicators,
    /// Plain HTTP, short, common TLD, nothing else odd
    StandardHttp,
    /// HTTPS but long, digit-heavy, or deep subdomain
    SuspiciousHttps,
    /// HTTPS, common TLD, shallow subdomain
    TrustedHttps,
    /// Any other plain HTTP
    PlainHttp,
    /// Leave the fused score alone
    Neutral,
}

impl CalibrationRegime {
    /// `(confidence_weight, evidence_adjustment)` for this regime
    pub fn parameters(&self, total_trust_bonus: f64) -> (f64, f64) {
        use super::rules::{TRUSTED_HTTPS_BASE_REDUCTION, TRUST_BONUS_FACTOR};

        match self {
            CalibrationRegime::StrongPhishingIndicators => (1.15, 0.10),
            CalibrationRegime::StandardHttp => (0.85, 0.08),
            CalibrationRegime::SuspiciousHttps => (0.90, 0.12),
            CalibrationRegime::TrustedHttps => (
                0.75,
                -(TRUSTED_HTTPS_BASE_REDUCTION + total_trust_bonus * TRUST_BONUS_FACTOR),
            ),
            CalibrationRegime::PlainHttp => (0.92, 0.05),
            CalibrationRegime::Neutral => (1.0, 0.0),
        }
    }
}

/// Everything calibration looked at and decided
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBreakdown {
    pub indicators: UrlIndicators,
    pub tld_bonus: f64,
    pub pattern_type: PatternType,
    pub pattern_bonus: f64,
    pub total_trust_bonus: f64,
    pub regime: CalibrationRegime,
    pub confidence_weight: f64,
    pub evidence_adjustment: f64,
    /// Before clamping
    pub raw_calibrated: f64,
    /// Final, within [0.02, 0.98]
    pub score: f64,
}

// ============================================================================
// SCAN REPORT
// ============================================================================

/// Full result of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub url: String,
    /// P(phishing) from the neural scorer
    pub lr_score: f64,
    /// Forest output, absent when disabled or not loaded
    pub forest: Option<ForestPrediction>,
    pub fusion: FusionOutcome,
    pub calibration: CalibrationBreakdown,
    /// Calibrated score in [0.02, 0.98]
    pub score: f64,
    pub percentage: u32,
    pub band: RiskBand,
    pub feature_version: u8,
    pub scanned_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(RiskBand::from_score(0.0), RiskBand::Safe);
        assert_eq!(RiskBand::from_score(0.254), RiskBand::Safe);
        assert_eq!(RiskBand::from_score(0.255), RiskBand::Warning);
        assert_eq!(RiskBand::from_score(0.50), RiskBand::Warning);
        assert_eq!(RiskBand::from_score(0.51), RiskBand::Phishing);
        assert_eq!(RiskBand::from_score(0.98), RiskBand::Phishing);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(to_percentage(0.846), 85);
        assert_eq!(to_percentage(0.02), 2);
        assert_eq!(to_percentage(f64::NAN), 0);
    }

    #[test]
    fn test_regime_parameters() {
        assert_eq!(CalibrationRegime::Neutral.parameters(0.5), (1.0, 0.0));
        let (w, adj) = CalibrationRegime::TrustedHttps.parameters(0.25);
        assert_eq!(w, 0.75);
        assert!((adj + 0.22).abs() < 1e-12);
        assert_eq!(CalibrationRegime::PlainHttp.parameters(0.0), (0.92, 0.05));
    }
}
