//! Evidence-Based Calibration
//!
//! `calibrated = fused * confidence_weight + evidence_adjustment`, with
//! the pair picked by the first matching regime, then clamped to
//! [0.02, 0.98]. Never fails: an unparsable URL leaves every indicator
//! false, which lands in the plain-HTTP regime.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::rules::*;
use super::types::{CalibrationBreakdown, CalibrationRegime, UrlIndicators};
use crate::logic::features::url as lexical;

static FREE_HOSTING: Lazy<Regex> =
    Lazy::new(|| Regex::new(FREE_HOSTING_PATTERN).expect("valid free hosting regex"));

// ============================================================================
// INDICATORS
// ============================================================================

/// Derive structural indicators from the URL as supplied
pub fn url_indicators(url: &str) -> UrlIndicators {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return UrlIndicators::default(),
    };

    let host = lexical::hostname(&parsed);
    let url_len = lexical::char_len(url);

    let is_https = parsed.scheme() == "https";
    let has_common_tld = lexical::is_common_tld(&host);
    let has_ip_address = lexical::is_ipv4_literal(&host);
    let has_deep_subdomain = lexical::label_count(&host) > DEEP_SUBDOMAIN_LABELS;
    let has_free_hosting = FREE_HOSTING.is_match(&host);
    let is_long_url = url_len > LONG_URL_LEN;
    let has_many_digits = lexical::count_digits(url) > MANY_DIGITS;

    UrlIndicators {
        is_https,
        has_common_tld,
        has_ip_address,
        has_deep_subdomain,
        has_free_hosting,
        is_long_url,
        has_many_digits,
        is_standard_http: !is_https
            && !has_ip_address
            && !has_free_hosting
            && url_len < SHORT_URL_LEN
            && has_common_tld,
        is_suspicious_https: is_https && (is_long_url || has_many_digits || has_deep_subdomain),
    }
}

/// Pick the first regime whose condition holds
pub fn select_regime(ind: &UrlIndicators) -> CalibrationRegime {
    if ind.has_ip_address || ind.has_free_hosting {
        CalibrationRegime::StrongPhishingIndicators
    } else if ind.is_standard_http {
        CalibrationRegime::StandardHttp
    } else if ind.is_suspicious_https {
        CalibrationRegime::SuspiciousHttps
    } else if ind.is_https && ind.has_common_tld && !ind.has_deep_subdomain {
        CalibrationRegime::TrustedHttps
    } else if !ind.is_https {
        CalibrationRegime::PlainHttp
    } else {
        CalibrationRegime::Neutral
    }
}

// ============================================================================
// TRUST BONUSES
// ============================================================================

/// Regional/institutional TLD bonus; `sld.tld` is checked before `tld`
pub fn tld_trust_bonus(host: &str) -> f64 {
    let host = host.to_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    let tld = labels.last().copied().unwrap_or("");

    if labels.len() >= 2 {
        let compound = format!("{}.{}", labels[labels.len() - 2], tld);
        if let Some(bonus) = tld_bonus_for(&compound) {
            log::debug!("[SmartAnalysis] TLD trust bonus for {}: {}", compound, bonus);
            return bonus;
        }
    }

    match tld_bonus_for(tld) {
        Some(bonus) => {
            log::debug!("[SmartAnalysis] TLD trust bonus for {}: {}", tld, bonus);
            bonus
        }
        None => 0.0,
    }
}

/// First path family whose fragment appears in the URL
pub fn detect_pattern(url: &str) -> PatternType {
    let lower = url.to_lowercase();
    PATTERN_FAMILIES
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|f| lower.contains(f)))
        .map(|(kind, _)| *kind)
        .unwrap_or(PatternType::Unknown)
}

// ============================================================================
// CALIBRATE
// ============================================================================

/// Calibrated score in [0.02, 0.98]
pub fn calibrate(fused_score: f64, url: &str) -> f64 {
    calibrate_detailed(fused_score, url).score
}

/// Calibrate and report every intermediate decision
pub fn calibrate_detailed(fused_score: f64, url: &str) -> CalibrationBreakdown {
    let indicators = url_indicators(url);

    let host = Url::parse(url).map(|u| lexical::hostname(&u)).unwrap_or_default();
    let tld_bonus = tld_trust_bonus(&host);
    let pattern_type = detect_pattern(url);
    let pattern_bonus = pattern_type.trust_bonus();
    let total_trust_bonus = tld_bonus + pattern_bonus;

    let regime = select_regime(&indicators);
    let (confidence_weight, evidence_adjustment) = regime.parameters(total_trust_bonus);

    let raw_calibrated = fused_score * confidence_weight + evidence_adjustment;
    let score = if raw_calibrated.is_nan() {
        CALIBRATED_MAX
    } else {
        raw_calibrated.clamp(CALIBRATED_MIN, CALIBRATED_MAX)
    };

    log::debug!(
        "[Calibration] regime={:?} weight={} adj={:.4} tld_bonus={:.2} pattern={} total_bonus={:.2} -> {:.4}",
        regime,
        confidence_weight,
        evidence_adjustment,
        tld_bonus,
        pattern_type.as_str(),
        total_trust_bonus,
        score
    );

    CalibrationBreakdown {
        indicators,
        tld_bonus,
        pattern_type,
        pattern_bonus,
        total_trust_bonus,
        regime,
        confidence_weight,
        evidence_adjustment,
        raw_calibrated,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_literal_regime() {
        for fused in [0.0, 0.3, 0.9] {
            let out = calibrate_detailed(fused, "http://192.168.1.5/login");
            assert_eq!(out.regime, CalibrationRegime::StrongPhishingIndicators);
            assert_eq!(out.confidence_weight, 1.15);
            assert_eq!(out.evidence_adjustment, 0.10);
        }
    }

    #[test]
    fn test_free_hosting_regime() {
        let out = calibrate_detailed(0.2, "https://login-secure.web.app/");
        assert_eq!(out.regime, CalibrationRegime::StrongPhishingIndicators);
    }

    #[test]
    fn test_trusted_https_with_ecommerce_path() {
        let out = calibrate_detailed(0.3, "https://example.com/product/123");
        assert_eq!(out.regime, CalibrationRegime::TrustedHttps);
        assert_eq!(out.pattern_type, PatternType::Ecommerce);
        assert_eq!(out.tld_bonus, 0.0);
        assert!((out.evidence_adjustment + (0.12 + 0.08 * 0.4)).abs() < 1e-12);
        // 0.3 * 0.75 - 0.152 = 0.073
        assert!((out.score - 0.073).abs() < 1e-9);

        let low = calibrate_detailed(0.0, "https://example.com/product/123");
        assert_eq!(low.score, CALIBRATED_MIN);
    }

    #[test]
    fn test_standard_http() {
        let out = calibrate_detailed(0.5, "http://example.com/");
        assert_eq!(out.regime, CalibrationRegime::StandardHttp);
        assert!((out.score - (0.5 * 0.85 + 0.08)).abs() < 1e-12);
    }

    #[test]
    fn test_suspicious_https() {
        let deep = calibrate_detailed(0.5, "https://a.b.c.example.com/");
        assert_eq!(deep.regime, CalibrationRegime::SuspiciousHttps);

        let digits = calibrate_detailed(0.5, "https://example.com/123456789");
        assert_eq!(digits.regime, CalibrationRegime::SuspiciousHttps);
    }

    #[test]
    fn test_plain_http_and_neutral() {
        // uncommon TLD over http
        let http = calibrate_detailed(0.5, "http://example.xyz/");
        assert_eq!(http.regime, CalibrationRegime::PlainHttp);

        // https, uncommon TLD, nothing suspicious
        let neutral = calibrate_detailed(0.5, "https://example.xyz/");
        assert_eq!(neutral.regime, CalibrationRegime::Neutral);
        assert_eq!(neutral.score, 0.5);
    }

    #[test]
    fn test_unparsable_url_falls_back_to_plain_http() {
        let out = calibrate_detailed(0.5, "not a url");
        assert_eq!(out.indicators, UrlIndicators::default());
        assert_eq!(out.regime, CalibrationRegime::PlainHttp);
    }

    #[test]
    fn test_output_always_bounded() {
        let urls = [
            "http://192.168.1.5/login",
            "https://example.com/product/123",
            "https://portal.go.id/forum/x",
            "http://example.xyz/",
            "https://example.xyz/",
            "garbage",
        ];
        for url in urls {
            for i in 0..=20 {
                let score = calibrate(i as f64 / 20.0, url);
                assert!((CALIBRATED_MIN..=CALIBRATED_MAX).contains(&score), "{} {}", url, score);
            }
        }
    }

    #[test]
    fn test_tld_bonus_compound_first() {
        assert_eq!(tld_trust_bonus("portal.go.id"), 0.25);
        assert_eq!(tld_trust_bonus("kaskus.co.id"), 0.18);
        assert_eq!(tld_trust_bonus("toko.id"), 0.15);
        assert_eq!(tld_trust_bonus("mit.edu"), 0.20);
        assert_eq!(tld_trust_bonus("example.com"), 0.0);
    }

    #[test]
    fn test_first_pattern_family_wins() {
        assert_eq!(detect_pattern("https://x.com/forum/product/1"), PatternType::Forum);
        assert_eq!(detect_pattern("https://x.com/SHOP/item"), PatternType::Ecommerce);
        assert_eq!(detect_pattern("https://x.com/berita/1"), PatternType::News);
        assert_eq!(detect_pattern("https://x.com/login"), PatternType::Unknown);
    }
}
