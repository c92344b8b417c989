//! Feature Extractor - builds the two vector layouts
//!
//! Full layout (50): URL features followed by content features. Lengths
//! and ratio denominators use the sanitized URL, counts and entropy use
//! the URL as supplied; the neural scorer was trained on exactly this mix.
//!
//! URL-only layout (22): every measurement on the URL as supplied, plus
//! a brand typosquatting index instead of the coarse length proxy.

use url::Url;

use super::content::{extract_content, ContentInput};
use super::layout::FeatureLayout;
use super::url as lexical;
use super::vector::FeatureVector;
use crate::constants::DEFAULT_CONTENT_MIN_LEN;

/// Brands checked for containment and single-deletion typos
pub const POPULAR_BRANDS: &[&str] = &[
    "google", "facebook", "amazon", "apple", "microsoft",
    "paypal", "netflix", "instagram", "twitter", "linkedin",
];

/// Shortest typo that still counts as brand-like
const MIN_TYPO_LEN: usize = 4;

const SHORT_URL_LEN: usize = 50;
const SHORT_DOMAIN_LEN: usize = 20;

// ============================================================================
// EXTRACTOR
// ============================================================================

/// Stateless feature extractor
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    /// Markup at or below this many characters counts as absent
    pub content_min_len: usize,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self {
            content_min_len: DEFAULT_CONTENT_MIN_LEN,
        }
    }
}

impl FeatureExtractor {
    pub fn new(content_min_len: usize) -> Self {
        Self { content_min_len }
    }

    /// 50-slot vector for the neural scorer.
    ///
    /// An unparsable URL yields the all-zero vector.
    pub fn extract(&self, raw_url: &str, html: &str) -> FeatureVector {
        let sanitized = lexical::sanitize_url(raw_url);
        let parsed = match Url::parse(&sanitized) {
            Ok(u) => u,
            Err(e) => {
                log::warn!("Feature extraction on unparsable URL ({}), returning zeros", e);
                return FeatureVector::zeroed(FeatureLayout::Full);
            }
        };

        let host = lexical::hostname(&parsed);
        let url_len = lexical::char_len(&sanitized);
        let domain_len = lexical::char_len(&host);

        let similarity = if url_len < SHORT_URL_LEN && domain_len < SHORT_DOMAIN_LEN {
            80.0
        } else {
            50.0
        };
        let continuation = lexical::ratio(lexical::longest_run(raw_url), url_len);

        let mut values = url_features(raw_url, &parsed, &host, url_len, similarity, continuation);

        let content = ContentInput {
            html,
            hostname: &host,
            raw_url,
            min_len: self.content_min_len,
        };
        values.extend(extract_content(&content));

        log::debug!(
            "Extracted full vector: url_len={} host={} has_content={}",
            url_len,
            host,
            content.has_content()
        );
        FeatureVector::from_values(FeatureLayout::Full, values)
    }

    /// 22-slot vector for the forest, computed on the URL as supplied.
    pub fn extract_url_only(&self, raw_url: &str) -> FeatureVector {
        let parsed = match Url::parse(raw_url) {
            Ok(u) => u,
            Err(e) => {
                log::warn!("URL-only extraction on unparsable URL ({}), returning zeros", e);
                return FeatureVector::zeroed(FeatureLayout::UrlOnly);
            }
        };

        let host = lexical::hostname(&parsed);
        let url_len = lexical::char_len(raw_url);

        let similarity = brand_similarity(&host);
        let continuation = if url_len > 1 {
            lexical::repeated_pairs(raw_url) as f64 / (url_len - 1) as f64
        } else {
            0.0
        };

        let values = url_features(raw_url, &parsed, &host, url_len, similarity, continuation);
        FeatureVector::from_values(FeatureLayout::UrlOnly, values)
    }
}

/// The 22 lexical slots shared by both layouts. `denominator` is the
/// length used for slot 0 and every ratio.
fn url_features(
    raw_url: &str,
    parsed: &Url,
    host: &str,
    denominator: usize,
    similarity: f64,
    continuation: f64,
) -> Vec<f64> {
    let tld = lexical::tld(host);
    let obfuscated = lexical::count_percent_escapes(raw_url);
    let letters = lexical::count_letters(raw_url);
    let digits = lexical::count_digits(raw_url);
    let specials = lexical::count_special_chars(raw_url);

    vec![
        denominator as f64,
        lexical::char_len(host) as f64,
        if lexical::is_ipv4_literal(host) { 1.0 } else { 0.0 },
        similarity,
        continuation,
        lexical::tld_probability(host),
        1.0 / (lexical::shannon_entropy(raw_url) + 1.0),
        lexical::char_len(tld) as f64,
        lexical::subdomain_count(host) as f64,
        if obfuscated > 0 { 1.0 } else { 0.0 },
        obfuscated as f64,
        lexical::ratio(obfuscated, denominator),
        letters as f64,
        lexical::ratio(letters, denominator),
        digits as f64,
        lexical::ratio(digits, denominator),
        lexical::count_char(raw_url, '=') as f64,
        lexical::count_char(raw_url, '?') as f64,
        lexical::count_char(raw_url, '&') as f64,
        specials as f64,
        lexical::ratio(specials, denominator),
        if parsed.scheme() == "https" { 1.0 } else { 0.0 },
    ]
}

/// 100 when the host contains a popular brand, 80 when it contains a
/// single-character-deletion typo of one, else 0.
pub fn brand_similarity(host: &str) -> f64 {
    let host = host.to_lowercase();
    let mut best: f64 = 0.0;

    for brand in POPULAR_BRANDS {
        if host.contains(brand) {
            return 100.0;
        }

        let chars: Vec<char> = brand.chars().collect();
        for skip in 0..chars.len() {
            let typo: String = chars
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, c)| c)
                .collect();
            if typo.chars().count() >= MIN_TYPO_LEN && host.contains(&typo) {
                best = best.max(80.0);
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_similarity() {
        assert_eq!(brand_similarity("www.paypal.com"), 100.0);
        assert_eq!(brand_similarity("paypl-login.xyz"), 80.0);
        assert_eq!(brand_similarity("gogle.example"), 80.0);
        assert_eq!(brand_similarity("kaskus.co.id"), 0.0);
    }

    #[test]
    fn test_full_similarity_proxy() {
        let extractor = FeatureExtractor::default();
        let short = extractor.extract("https://example.com/", "");
        assert_eq!(short.get(3), Some(80.0));

        let long = extractor.extract(
            "https://a-very-long-subdomain-name.example.com/some/deep/path",
            "",
        );
        assert_eq!(long.get(3), Some(50.0));
    }
}
