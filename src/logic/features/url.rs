//! URL Features - lexical measurements over the URL string
//!
//! Pure helpers shared by both vector layouts. Lengths are counted in
//! characters, not bytes.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Query parameters that only carry campaign/click/session identifiers
pub const TRACKING_PARAMS: &[&str] = &[
    "utm_source", "utm_medium", "utm_campaign", "utm_term", "utm_content",
    "fbclid", "gclid", "srsltid", "ref", "referer", "source", "tracking",
    "click_id", "affiliate", "sid", "session", "sessionid", "_ga", "_gl",
];

/// Values longer than this that look like opaque tokens are dropped
pub const TRACKING_TOKEN_MIN_LEN: usize = 20;

/// TLDs scored as "legitimate" (0.9)
pub const COMMON_TLDS: &[&str] = &["com", "org", "net", "edu", "gov", "io", "co", "id"];

pub const COMMON_TLD_PROB: f64 = 0.9;
pub const UNCOMMON_TLD_PROB: f64 = 0.3;

static TRACKING_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid tracking token regex")
});

static PERCENT_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%[0-9A-Fa-f]{2}").expect("valid percent escape regex")
});

static IPV4_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").expect("valid ipv4 regex")
});

// ============================================================================
// SANITIZATION
// ============================================================================

/// Strip tracking parameters so they don't inflate length/entropy features.
///
/// Removes every name in [`TRACKING_PARAMS`] plus any parameter whose
/// decoded value is longer than [`TRACKING_TOKEN_MIN_LEN`] and matches
/// `[A-Za-z0-9_-]+`. Unparsable input is returned unchanged.
pub fn sanitize_url(raw: &str) -> String {
    let mut parsed = match Url::parse(raw) {
        Ok(u) => u,
        Err(_) => return raw.to_string(),
    };

    if parsed.query().is_some() {
        let kept: Vec<(String, String)> = parsed
            .query_pairs()
            .filter(|(key, value)| !is_tracking_param(key, value))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            parsed.set_query(None);
        } else {
            parsed.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    let sanitized = parsed.to_string();
    if sanitized != raw {
        log::debug!(
            "URL sanitized: {} -> {} chars",
            char_len(raw),
            char_len(&sanitized)
        );
    }
    sanitized
}

fn is_tracking_param(key: &str, value: &str) -> bool {
    TRACKING_PARAMS.contains(&key)
        || (char_len(value) > TRACKING_TOKEN_MIN_LEN && TRACKING_TOKEN.is_match(value))
}

// ============================================================================
// STRING STATISTICS
// ============================================================================

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Shannon entropy (bits) of the character distribution
pub fn shannon_entropy(s: &str) -> f64 {
    let len = char_len(s);
    if len == 0 {
        return 0.0;
    }

    let mut frequencies: std::collections::HashMap<char, usize> = std::collections::HashMap::new();
    for c in s.chars() {
        *frequencies.entry(c).or_insert(0) += 1;
    }

    frequencies.values().fold(0.0, |entropy, &count| {
        let p = count as f64 / len as f64;
        entropy - p * p.log2()
    })
}

/// Longest run of identical consecutive characters
pub fn longest_run(s: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut prev: Option<char> = None;

    for c in s.chars() {
        current = if prev == Some(c) { current + 1 } else { 1 };
        longest = longest.max(current);
        prev = Some(c);
    }

    longest
}

/// Number of positions where a character repeats its predecessor
pub fn repeated_pairs(s: &str) -> usize {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(2).filter(|w| w[0] == w[1]).count()
}

pub fn count_percent_escapes(s: &str) -> usize {
    PERCENT_ESCAPE.find_iter(s).count()
}

pub fn count_letters(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_alphabetic()).count()
}

pub fn count_digits(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}

pub fn count_char(s: &str, target: char) -> usize {
    s.chars().filter(|&c| c == target).count()
}

/// Anything that is not an ASCII letter/digit and not whitespace
pub fn count_special_chars(s: &str) -> usize {
    s.chars()
        .filter(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace())
        .count()
}

/// `numerator / denominator`, with a zero denominator resolving to 0
pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

// ============================================================================
// HOST HELPERS
// ============================================================================

/// Lower-cased hostname, empty when the URL has none
pub fn hostname(url: &Url) -> String {
    url.host_str().unwrap_or("").to_lowercase()
}

pub fn is_ipv4_literal(host: &str) -> bool {
    IPV4_LITERAL.is_match(host)
}

/// Last dot-separated label
pub fn tld(host: &str) -> &str {
    host.rsplit('.').next().unwrap_or("")
}

pub fn is_common_tld(host: &str) -> bool {
    COMMON_TLDS.contains(&tld(host))
}

pub fn tld_probability(host: &str) -> f64 {
    if is_common_tld(host) {
        COMMON_TLD_PROB
    } else {
        UNCOMMON_TLD_PROB
    }
}

pub fn label_count(host: &str) -> usize {
    host.split('.').count()
}

/// Labels beyond the registrable two
pub fn subdomain_count(host: &str) -> usize {
    label_count(host).saturating_sub(2)
}

// ============================================================================
// TESTS
// ============================================================================
