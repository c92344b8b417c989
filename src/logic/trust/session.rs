//! Session Trust Store
//!
//! Domains the user chose to proceed to during this run. In memory only,
//! cleared on explicit request. Cloning the store shares the same set.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::allowlist::COMPOUND_TLDS;

/// One user-trusted domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustEntry {
    pub domain: String,
    pub added_at: DateTime<Utc>,
}

/// Shared, injected session trust set
#[derive(Debug, Clone, Default)]
pub struct SessionTrustStore {
    entries: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl SessionTrustStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(domain: &str) -> String {
        domain.trim().trim_end_matches('.').to_lowercase()
    }

    /// At least two non-empty labels and not a registry suffix such as
    /// `com` or `co.id`. Anything coarser would trust a whole TLD.
    pub fn is_trustable(domain: &str) -> bool {
        let domain = Self::normalize(domain);
        let labels: Vec<&str> = domain.split('.').collect();
        labels.len() >= 2
            && labels.iter().all(|l| !l.is_empty())
            && !COMPOUND_TLDS.contains(&domain.as_str())
    }

    /// Add a domain. Idempotent; returns false for an existing entry or
    /// for input that fails `is_trustable`.
    pub fn trust(&self, domain: &str) -> bool {
        if !Self::is_trustable(domain) {
            log::warn!("Refusing to trust registry-level domain: {:?}", domain);
            return false;
        }
        let domain = Self::normalize(domain);

        let mut entries = self.entries.write();
        if entries.contains_key(&domain) {
            return false;
        }
        log::info!("Domain trusted for session: {}", domain);
        entries.insert(domain, Utc::now());
        true
    }

    /// Drop every entry. Idempotent.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        if !entries.is_empty() {
            log::info!("Session trusted domains cleared ({} entries)", entries.len());
        }
        entries.clear();
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.entries.read().contains_key(domain)
    }

    /// Sorted domain names
    pub fn list(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.entries.read().keys().cloned().collect();
        domains.sort();
        domains
    }

    /// Entries with the time they were added, oldest first
    pub fn entries(&self) -> Vec<TrustEntry> {
        let mut entries: Vec<TrustEntry> = self
            .entries
            .read()
            .iter()
            .map(|(domain, added_at)| TrustEntry {
                domain: domain.clone(),
                added_at: *added_at,
            })
            .collect();
        entries.sort_by(|a, b| a.added_at.cmp(&b.added_at).then_with(|| a.domain.cmp(&b.domain)));
        entries
    }

    /// Run `f` against every entry while holding one read lock
    pub fn any<F>(&self, f: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        self.entries.read().keys().any(|d| f(d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
