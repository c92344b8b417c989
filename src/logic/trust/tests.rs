//! Integration Tests for Domain Trust
//!
//! Matcher + session store + base domain working together.

#[cfg(test)]
mod integration_tests {
    use crate::logic::trust::{base_domain, DomainTrustMatcher, SessionTrustStore, TrustSource};

    fn matcher() -> (DomainTrustMatcher, SessionTrustStore) {
        let store = SessionTrustStore::new();
        (DomainTrustMatcher::new(store.clone()), store)
    }

    #[test]
    fn test_static_trust() {
        let (m, _) = matcher();
        assert_eq!(m.trust_source("github.com"), Some(TrustSource::AllowList));
        assert_eq!(m.trust_source("Docs.GitHub.com"), Some(TrustSource::AllowList));
        assert_eq!(m.trust_source("portal.kemdikbud.go.id"), Some(TrustSource::TrustedTld));
        assert!(m.is_statically_trusted("www.ox.ac.uk"));
        assert!(!m.is_trusted("github.com.login-verify.net"));
        assert!(!m.is_trusted(""));
    }

    #[test]
    fn test_www_reflexive_session_trust() {
        let (m, store) = matcher();
        store.trust("example.com");
        assert!(m.is_trusted("www.example.com"));
        assert!(m.is_trusted("example.com"));

        let (m, store) = matcher();
        store.trust("www.example.com");
        assert!(m.is_trusted("example.com"));
        assert!(m.is_trusted("www.example.com"));
        assert_eq!(m.trust_source("example.com"), Some(TrustSource::Session));
    }

    #[test]
    fn test_session_covers_subdomains_only() {
        let (m, store) = matcher();
        store.trust("kaskus.co.id");
        assert!(m.is_session_trusted("forum.kaskus.co.id"));
        assert!(m.is_session_trusted("www.kaskus.co.id"));
        assert!(!m.is_session_trusted("notkaskus.co.id"));
        assert!(!m.is_session_trusted("co.id"));
        assert!(!m.is_statically_trusted("forum.kaskus.co.id"));
    }

    #[test]
    fn test_clear_revokes_trust() {
        let (m, store) = matcher();
        store.trust("example.org");
        assert!(m.is_trusted("example.org"));
        m.session().clear();
        assert!(!m.is_trusted("example.org"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_base_domain() {
        assert_eq!(base_domain("https://shop.kaskus.co.id/x").as_deref(), Some("kaskus.co.id"));
        assert_eq!(base_domain("https://www.example.com").as_deref(), Some("example.com"));
        assert_eq!(base_domain("https://a.b.example.com/p").as_deref(), Some("example.com"));
        assert_eq!(base_domain("https://www.bbc.co.uk/news").as_deref(), Some("bbc.co.uk"));
        assert_eq!(base_domain("http://localhost:8080/").as_deref(), Some("localhost"));
        assert_eq!(base_domain("not a url"), None);
    }

    #[test]
    fn test_base_domain_never_trusts_a_registry() {
        // a bare compound TLD host is not "under" itself
        assert_eq!(base_domain("https://co.id/").as_deref(), Some("co.id"));
        let (m, store) = matcher();
        if let Some(domain) = base_domain("https://toko.co.id/") {
            store.trust(&domain);
        }
        assert!(m.is_trusted("toko.co.id"));
        assert!(!m.is_trusted("other.co.id"));

        assert!(!store.trust("co.id"));
        assert!(!m.is_trusted("another.co.id"));
    }

    #[test]
    fn test_trailing_dot_host_keeps_registrable_domain() {
        assert_eq!(
            base_domain("https://login.evil.com./verify").as_deref(),
            Some("evil.com")
        );
        assert_eq!(
            base_domain("https://shop.kaskus.co.id./x").as_deref(),
            Some("kaskus.co.id")
        );

        let (m, store) = matcher();
        for url in ["https://login.evil.com./verify", "https://shop.kaskus.co.id./x"] {
            if let Some(domain) = base_domain(url) {
                store.trust(&domain);
            }
        }
        assert_eq!(store.list(), vec!["evil.com".to_string(), "kaskus.co.id".to_string()]);
        assert!(m.is_trusted("login.evil.com"));
        assert!(!m.is_trusted("mybank.com"));
        assert!(!m.is_trusted("paypal-login.com"));
        assert!(!m.is_trusted("bank.id"));
    }

    #[test]
    fn test_should_skip_url() {
        let (m, store) = matcher();
        assert!(m.should_skip_url(""));
        assert!(m.should_skip_url("ftp://example.com/"));
        assert!(m.should_skip_url("chrome://settings"));
        assert!(m.should_skip_url("https://example.net/?guardnet-verified=1"));
        assert!(m.should_skip_url("https://www.google.com/search?q=x"));
        assert!(m.should_skip_url("https://example.net/redirect?to=about:blank"));
        assert!(!m.should_skip_url("https://example.net/login"));

        store.trust("example.net");
        assert!(m.should_skip_url("https://example.net/login"));
    }
}
