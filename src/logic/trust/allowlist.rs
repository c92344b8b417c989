//! Static Allow-List
//!
//! Compiled-in hostnames and TLD suffixes that are never scanned.

/// Hostnames trusted along with all of their subdomains
pub const TRUSTED_DOMAINS: &[&str] = &[
    // Search engines
    "google.com", "www.google.com", "google.co.id",
    "bing.com", "www.bing.com",
    "duckduckgo.com", "www.duckduckgo.com",
    "yahoo.com", "www.yahoo.com", "search.yahoo.com",
    "yandex.com", "www.yandex.com",
    "baidu.com", "www.baidu.com",

    // Q&A and forums
    "quora.com", "www.quora.com", "id.quora.com",
    "stackoverflow.com", "www.stackoverflow.com",
    "stackexchange.com", "www.stackexchange.com",
    "medium.com", "www.medium.com",

    // Social media
    "facebook.com", "www.facebook.com", "m.facebook.com",
    "instagram.com", "www.instagram.com",
    "twitter.com", "www.twitter.com", "x.com", "www.x.com",
    "linkedin.com", "www.linkedin.com",
    "tiktok.com", "www.tiktok.com",
    "reddit.com", "www.reddit.com",
    "pinterest.com", "www.pinterest.com",

    // Tech
    "microsoft.com", "www.microsoft.com", "login.microsoftonline.com",
    "apple.com", "www.apple.com",
    "amazon.com", "www.amazon.com",
    "github.com", "www.github.com",
    "gitlab.com", "www.gitlab.com",

    // Video/media
    "youtube.com", "www.youtube.com", "m.youtube.com",
    "netflix.com", "www.netflix.com",
    "spotify.com", "www.spotify.com",
    "twitch.tv", "www.twitch.tv",

    // Productivity
    "gmail.com", "mail.google.com",
    "outlook.com", "outlook.live.com",
    "drive.google.com", "docs.google.com",
    "dropbox.com", "www.dropbox.com",
    "notion.so", "www.notion.so",
    "slack.com", "www.slack.com",
    "discord.com", "www.discord.com", "discord.gg",
    "zoom.us", "www.zoom.us",

    // Shopping
    "shopee.co.id", "shopee.com",
    "tokopedia.com", "www.tokopedia.com",
    "bukalapak.com", "www.bukalapak.com",
    "lazada.co.id", "lazada.com",
    "ebay.com", "www.ebay.com",
    "aliexpress.com", "www.aliexpress.com",

    // Banking (Indonesia)
    "bca.co.id", "klikbca.com", "ibank.bca.co.id",
    "bni.co.id", "ibank.bni.co.id",
    "bri.co.id", "ib.bri.co.id",
    "mandirionline.co.id", "bankmandiri.co.id",

    // News
    "detik.com", "www.detik.com",
    "kompas.com", "www.kompas.com",
    "tribunnews.com", "www.tribunnews.com",
    "cnn.com", "www.cnn.com",
    "bbc.com", "www.bbc.com",

    // Others
    "wikipedia.org", "en.wikipedia.org", "id.wikipedia.org",
    "whatsapp.com", "web.whatsapp.com",
    "telegram.org", "web.telegram.org",
];

/// Institutional suffixes (education, government, military)
pub const TRUSTED_TLDS: &[&str] = &[
    ".edu", ".ac.id", ".ac.uk", ".edu.au", ".gov", ".gov.id", ".go.id", ".mil",
];

/// Two-label registry suffixes that need one extra label for a base domain
pub const COMPOUND_TLDS: &[&str] = &[
    "co.id", "or.id", "ac.id", "go.id", "web.id", "my.id",
    "co.uk", "com.au", "co.jp", "com.sg",
];

/// Browser-internal pages that are never scanned
pub const INTERNAL_PAGE_MARKERS: &[&str] = &[
    "chrome.google.com",
    "chrome://",
    "edge://",
    "about:",
    "chrome-extension://",
];

/// `host` equals `parent` or is one of its subdomains
pub fn is_same_or_subdomain(host: &str, parent: &str) -> bool {
    if parent.is_empty() {
        return false;
    }
    host == parent
        || (host.len() > parent.len()
            && host.ends_with(parent)
            && host.as_bytes()[host.len() - parent.len() - 1] == b'.')
}

/// Allow-listed hostname (or subdomain of one)
pub fn is_trusted_domain(host: &str) -> bool {
    TRUSTED_DOMAINS.iter().any(|trusted| is_same_or_subdomain(host, trusted))
}

/// Hostname under an institutional suffix
pub fn has_trusted_tld(host: &str) -> Option<&'static str> {
    TRUSTED_TLDS.iter().copied().find(|tld| host.ends_with(tld))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_or_subdomain() {
        assert!(is_same_or_subdomain("example.com", "example.com"));
        assert!(is_same_or_subdomain("a.example.com", "example.com"));
        assert!(!is_same_or_subdomain("badexample.com", "example.com"));
        assert!(!is_same_or_subdomain("example.com", "a.example.com"));
        assert!(!is_same_or_subdomain("example.com", ""));
    }

    #[test]
    fn test_static_lists() {
        assert!(is_trusted_domain("github.com"));
        assert!(is_trusted_domain("gist.github.com"));
        assert!(!is_trusted_domain("github.com.evil.net"));
        assert_eq!(has_trusted_tld("www.ui.ac.id"), Some(".ac.id"));
        assert_eq!(has_trusted_tld("harvard.edu"), Some(".edu"));
        assert_eq!(has_trusted_tld("example.com"), None);
    }
}
