//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! Both scorers were trained against a fixed index-to-meaning mapping.
//! The neural scorer reads the full 50-slot layout, the forest reads the
//! first 22 slots (URL-only) computed on the raw URL.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the full vector
pub const FULL_FEATURE_LAYOUT: &[&str] = &[
    // === URL lexical (0-21) ===
    "url_length",                 // 0: Length of the sanitized URL
    "domain_length",              // 1: Hostname length
    "is_domain_ip",               // 2: Hostname is an IPv4 literal
    "url_similarity_index",       // 3: Brand similarity (coarse proxy in full layout)
    "char_continuation_rate",     // 4: Repeated-character run rate
    "tld_legitimate_prob",        // 5: 0.9 for common TLDs, 0.3 otherwise
    "url_char_prob",              // 6: 1 / (entropy + 1)
    "tld_length",                 // 7: Length of the last hostname label
    "no_of_subdomain",            // 8: Hostname labels beyond two
    "has_obfuscation",            // 9: Any %XX escape present
    "no_of_obfuscated_char",      // 10: Number of %XX escapes
    "obfuscation_ratio",          // 11: Escapes per URL character
    "no_of_letters_in_url",       // 12: ASCII letters
    "letter_ratio_in_url",        // 13: Letters per URL character
    "no_of_digits_in_url",        // 14: ASCII digits
    "digit_ratio_in_url",         // 15: Digits per URL character
    "no_of_equals_in_url",        // 16: '=' count
    "no_of_qmark_in_url",         // 17: '?' count
    "no_of_ampersand_in_url",     // 18: '&' count
    "no_of_other_special_chars",  // 19: Non-alphanumeric, non-space chars
    "special_char_ratio_in_url",  // 20: Specials per URL character
    "is_https",                   // 21: Scheme is https

    // === Page content (22-49) ===
    "line_of_code",               // 22: Markup line count (100 when absent)
    "largest_line_length",        // 23: Longest markup line (500 when absent)
    "has_title",                  // 24: Always 1 client-side
    "domain_title_match_score",   // 25: Title mentions the domain label
    "url_title_match_score",      // 26: Title contains the whole URL
    "has_favicon",                // 27: Always 1 client-side
    "robots",                     // 28: Markup mentions robots
    "is_responsive",              // 29: Viewport meta or @media rule
    "no_of_url_redirect",         // 30: Always 0 client-side
    "no_of_self_redirect",        // 31: Always 0 client-side
    "has_description",            // 32: Always 1 client-side
    "no_of_popup",                // 33: window.open calls
    "no_of_iframe",               // 34: <iframe> count
    "has_external_form_submit",   // 35: Form posts to another host
    "has_social_net",             // 36: Social network mention
    "has_submit_button",          // 37: Submit input/button
    "has_hidden_fields",          // 38: Hidden inputs
    "has_password_field",         // 39: Password inputs
    "bank",                       // 40: Banking keyword
    "pay",                        // 41: Payment keyword
    "crypto",                     // 42: Crypto keyword
    "has_copyright_info",         // 43: Copyright notice
    "no_of_image",                // 44: <img> count
    "no_of_css",                  // 45: Stylesheet links + <style> blocks
    "no_of_js",                   // 46: <script> count
    "no_of_self_ref",             // 47: Anchors pointing at this host
    "no_of_empty_ref",            // 48: Empty or placeholder anchors
    "no_of_external_ref",         // 49: Anchors pointing elsewhere
];

/// Total number of features in the full layout
/// IMPORTANT: Must match FULL_FEATURE_LAYOUT.len()!
pub const FULL_FEATURE_COUNT: usize = 50;

/// Number of leading features that form the URL-only layout
pub const URL_FEATURE_COUNT: usize = 22;

/// URL-only layout, a prefix of the full one
pub const URL_FEATURE_LAYOUT: &[&str] = FULL_FEATURE_LAYOUT.split_at(URL_FEATURE_COUNT).0;

// ============================================================================
// LAYOUT KIND
// ============================================================================

/// Which of the two vector shapes a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureLayout {
    /// 50 slots: URL + content, consumed by the neural scorer
    Full,
    /// 22 slots: URL only, consumed by the forest
    UrlOnly,
}

impl FeatureLayout {
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            FeatureLayout::Full => FULL_FEATURE_LAYOUT,
            FeatureLayout::UrlOnly => URL_FEATURE_LAYOUT,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FeatureLayout::Full => FULL_FEATURE_COUNT,
            FeatureLayout::UrlOnly => URL_FEATURE_COUNT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureLayout::Full => "full",
            FeatureLayout::UrlOnly => "url_only",
        }
    }

    /// Compute CRC32 hash of this layout
    /// Used to detect layout mismatches at runtime
    pub fn hash(&self) -> u32 {
        let mut hasher = Hasher::new();

        hasher.update(&[FEATURE_VERSION]);
        hasher.update(self.as_str().as_bytes());

        for name in self.names() {
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
        }

        hasher.finalize()
    }

    /// Get feature index by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names().iter().position(|&n| n == name)
    }

    /// Get feature name by index
    pub fn name_at(&self, index: usize) -> Option<&'static str> {
        self.names().get(index).copied()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub expected: FeatureLayout,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected {} v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected.as_str(),
            FEATURE_VERSION,
            self.expected_hash,
            self.actual_version,
            self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that incoming data matches the given layout
pub fn validate_layout(
    layout: FeatureLayout,
    incoming_version: u8,
    incoming_hash: u32,
) -> Result<(), LayoutMismatchError> {
    let current_hash = layout.hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected: layout,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
