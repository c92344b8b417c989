//! Fusion & Calibration Rules
//!
//! Weights, regimes, and lookup tables. No scoring logic lives here.

use serde::{Deserialize, Serialize};

// ============================================================================
// FUSION WEIGHTS (neural share; forest gets the remainder)
// ============================================================================

/// Binary decision boundary shared by both scorers
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Scorers on the same side: forest is a minority corroborator
pub const AGREE_LR_WEIGHT: f64 = 0.7;

/// Scorers on opposite sides
pub const DISAGREE_LR_WEIGHT: f64 = 0.85;

/// Opposite sides with an extreme, far-off forest vote
pub const DISTRUST_RF_LR_WEIGHT: f64 = 0.95;

/// Forest scores outside (LOW, HIGH) count as extreme
pub const RF_EXTREME_HIGH: f64 = 0.9;
pub const RF_EXTREME_LOW: f64 = 0.1;

/// Minimum |lr - rf| for the extreme override
pub const RF_EXTREME_GAP: f64 = 0.4;

// ============================================================================
// CALIBRATION
// ============================================================================

/// Output never asserts certainty in either direction
pub const CALIBRATED_MIN: f64 = 0.02;
pub const CALIBRATED_MAX: f64 = 0.98;

/// "Long" URL (characters)
pub const LONG_URL_LEN: usize = 75;

/// "Short" URL for the plain-HTTP regime (characters, exclusive)
pub const SHORT_URL_LEN: usize = 60;

/// More digits than this is suspicious
pub const MANY_DIGITS: usize = 8;

/// More hostname labels than this is a deep subdomain
pub const DEEP_SUBDOMAIN_LABELS: usize = 3;

/// Base reduction for the trusted-HTTPS regime
pub const TRUSTED_HTTPS_BASE_REDUCTION: f64 = 0.12;

/// Share of the trust bonus folded into the trusted-HTTPS reduction
pub const TRUST_BONUS_FACTOR: f64 = 0.4;

/// Free hosting providers favoured by phishing kits
pub const FREE_HOSTING_PATTERN: &str = r"(firebaseapp|weebly|000webhostapp|repl\.co|web\.app|workers\.dev)";

/// TLD trust bonuses; compound entries are looked up before single labels
pub const TLD_TRUST_BONUSES: &[(&str, f64)] = &[
    ("id", 0.15),
    ("co.id", 0.18),
    ("or.id", 0.18),
    ("ac.id", 0.20),
    ("go.id", 0.25),
    ("jp", 0.12),
    ("de", 0.12),
    ("uk", 0.12),
    ("au", 0.12),
    ("sg", 0.12),
    ("gov", 0.25),
    ("edu", 0.20),
    ("mil", 0.25),
];

/// Families of legitimate-looking path fragments, checked in order
pub const PATTERN_FAMILIES: &[(PatternType, &[&str])] = &[
    (
        PatternType::Forum,
        &["/thread/", "/forum/", "/topic/", "/post/", "/discussion/", "/board/", "/community/"],
    ),
    (
        PatternType::Ecommerce,
        &["/product/", "/products/", "/item/", "/cart/", "/checkout/", "/shop/", "/store/", "/catalog/"],
    ),
    (
        PatternType::News,
        &["/article/", "/news/", "/blog/", "/read/", "/berita/", "/artikel/"],
    ),
];

/// Legitimate-site path family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Forum,
    Ecommerce,
    News,
    Unknown,
}

impl PatternType {
    pub fn trust_bonus(&self) -> f64 {
        match self {
            PatternType::Forum => 0.10,
            PatternType::Ecommerce | PatternType::News => 0.08,
            PatternType::Unknown => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Forum => "forum",
            PatternType::Ecommerce => "ecommerce",
            PatternType::News => "news",
            PatternType::Unknown => "unknown",
        }
    }
}

/// Bonus for a TLD or compound TLD key, if listed
pub fn tld_bonus_for(key: &str) -> Option<f64> {
    TLD_TRUST_BONUSES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, bonus)| *bonus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fusion_weights_sum_below_one() {
        for w in [AGREE_LR_WEIGHT, DISAGREE_LR_WEIGHT, DISTRUST_RF_LR_WEIGHT] {
            assert!(w > 0.5 && w < 1.0);
        }
    }

    #[test]
    fn test_tld_bonus_lookup() {
        assert_eq!(tld_bonus_for("go.id"), Some(0.25));
        assert_eq!(tld_bonus_for("jp"), Some(0.12));
        assert_eq!(tld_bonus_for("com"), None);
    }

    #[test]
    fn test_pattern_bonuses() {
        assert_eq!(PatternType::Forum.trust_bonus(), 0.10);
        assert_eq!(PatternType::Ecommerce.trust_bonus(), 0.08);
        assert_eq!(PatternType::Unknown.as_str(), "unknown");
    }
}
