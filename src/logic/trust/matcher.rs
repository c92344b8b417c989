//! Domain Trust Matcher
//!
//! Decides whether a hostname bypasses scoring: static allow-list,
//! institutional TLDs, then the injected session store.

use url::Url;

use super::allowlist::{
    has_trusted_tld, is_same_or_subdomain, is_trusted_domain, COMPOUND_TLDS, INTERNAL_PAGE_MARKERS,
};
use super::session::SessionTrustStore;
use crate::constants::VERIFIED_MARKER;

/// Why a hostname was trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustSource {
    AllowList,
    TrustedTld,
    Session,
}

#[derive(Debug, Clone, Default)]
pub struct DomainTrustMatcher {
    session: SessionTrustStore,
}

impl DomainTrustMatcher {
    pub fn new(session: SessionTrustStore) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionTrustStore {
        &self.session
    }

    /// Trusted by any source; never fails
    pub fn is_trusted(&self, hostname: &str) -> bool {
        self.trust_source(hostname).is_some()
    }

    /// First source that trusts `hostname`, checked in order
    pub fn trust_source(&self, hostname: &str) -> Option<TrustSource> {
        let host = hostname.trim().to_lowercase();
        if host.is_empty() {
            return None;
        }

        if is_trusted_domain(&host) {
            return Some(TrustSource::AllowList);
        }
        if let Some(tld) = has_trusted_tld(&host) {
            log::debug!("Trusted TLD detected: {}", tld);
            return Some(TrustSource::TrustedTld);
        }
        if self.is_session_trusted(&host) {
            return Some(TrustSource::Session);
        }
        None
    }

    /// Allow-list or institutional TLD
    pub fn is_statically_trusted(&self, hostname: &str) -> bool {
        let host = hostname.trim().to_lowercase();
        !host.is_empty() && (is_trusted_domain(&host) || has_trusted_tld(&host).is_some())
    }

    /// Session match in either direction, modulo a leading `www.`
    pub fn is_session_trusted(&self, hostname: &str) -> bool {
        let host = hostname.trim().to_lowercase();
        let normalized = strip_www(&host);

        if self.session.contains(&host) || self.session.contains(normalized) {
            log::debug!("Session exact match for: {}", host);
            return true;
        }

        self.session.any(|trusted| {
            if is_same_or_subdomain(&host, trusted) || is_same_or_subdomain(normalized, trusted) {
                log::debug!("Session domain match: {} -> {}", host, trusted);
                return true;
            }

            // trusting www.example.com also covers example.com
            if is_same_or_subdomain(normalized, strip_www(trusted)) {
                log::debug!("Session reverse match: {} -> {}", host, trusted);
                return true;
            }
            false
        })
    }

    /// Checked before every navigation; true means "don't scan"
    pub fn should_skip_url(&self, url: &str) -> bool {
        if url.is_empty() {
            return true;
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return true;
        }
        if url.contains(VERIFIED_MARKER) {
            return true;
        }

        if let Some(host) = host_of(url) {
            if self.is_trusted(&host) {
                log::debug!("Trusted domain, skipping: {}", url);
                return true;
            }
        }

        INTERNAL_PAGE_MARKERS.iter().any(|m| url.contains(m))
    }
}

/// Lower-cased hostname of a URL without the root `.`, `None` when it has
/// none or won't parse
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok().and_then(|u| {
        u.host_str()
            .map(|h| h.strip_suffix('.').unwrap_or(h).to_lowercase())
    })
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Registrable domain for session trust, aware of compound TLDs.
///
/// `shop.kaskus.co.id` → `kaskus.co.id`, `www.example.com` → `example.com`.
/// `None` when the URL can't be parsed or has no host.
pub fn base_domain(url: &str) -> Option<String> {
    let host = host_of(url)?;
    let labels: Vec<&str> = host.split('.').collect();

    for ctld in COMPOUND_TLDS {
        if host.ends_with(&format!(".{}", ctld)) {
            let keep = ctld.split('.').count() + 1;
            return Some(labels[labels.len().saturating_sub(keep)..].join("."));
        }
    }

    if labels.len() >= 2 {
        let labels = if labels[0] == "www" && labels.len() > 2 {
            &labels[1..]
        } else {
            &labels[..]
        };
        return Some(labels[labels.len() - 2..].join("."));
    }

    Some(host)
}
