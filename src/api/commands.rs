//! Scan Commands - Caller-facing API
//!
//! One `ScanService` per process: owns the pipeline and the session trust
//! set, and is what the navigation hook and the binary talk to.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{ScanError, ScanResult};
use crate::logic::config::EngineConfig;
use crate::logic::model::{EngineStatus, ModelStore, VotingStats};
use crate::logic::pipeline::RiskPipeline;
use crate::logic::threat::ScanReport;
use crate::logic::trust::{base_domain, DomainTrustMatcher, SessionTrustStore, TrustEntry};

// ============================================================================
// SERVICE
// ============================================================================

pub struct ScanService {
    pipeline: RiskPipeline,
    matcher: DomainTrustMatcher,
}

impl ScanService {
    /// Service with its own store and an empty session
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(Arc::new(ModelStore::new(config)), SessionTrustStore::new())
    }

    /// Service over an existing store; `session` may be shared with other callers
    pub fn with_store(store: Arc<ModelStore>, session: SessionTrustStore) -> Self {
        Self {
            pipeline: RiskPipeline::with_store(store),
            matcher: DomainTrustMatcher::new(session),
        }
    }

    pub fn pipeline(&self) -> &RiskPipeline {
        &self.pipeline
    }

    pub fn matcher(&self) -> &DomainTrustMatcher {
        &self.matcher
    }

    // ------------------------------------------------------------------------
    // Scoring
    // ------------------------------------------------------------------------

    /// Calibrated phishing score
    pub async fn score(&self, url: &str, html: Option<&str>) -> ScanResult<f64> {
        self.pipeline.score(url, html).await
    }

    pub async fn scan(&self, url: &str, html: Option<&str>) -> ScanResult<ScanReport> {
        self.pipeline.scan(url, html).await
    }

    /// `scan` bounded by `scan_timeout_secs`. A timeout is final.
    pub async fn scan_with_timeout(&self, url: &str, html: Option<&str>) -> ScanResult<ScanReport> {
        let secs = self.pipeline.config().scan_timeout_secs;
        match tokio::time::timeout(Duration::from_secs(secs), self.scan(url, html)).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("Scan of {} timed out after {}s", url, secs);
                Err(ScanError::Timeout(secs))
            }
        }
    }

    pub async fn voting_stats(&self, url: &str) -> ScanResult<VotingStats> {
        self.pipeline.voting_stats(url).await
    }

    pub fn status(&self) -> EngineStatus {
        self.pipeline.status()
    }

    // ------------------------------------------------------------------------
    // Trust
    // ------------------------------------------------------------------------

    /// True when the navigation should not be scanned at all
    pub fn should_skip(&self, url: &str) -> bool {
        self.matcher.should_skip_url(url)
    }

    pub fn is_trusted(&self, hostname: &str) -> bool {
        self.matcher.is_trusted(hostname)
    }

    /// User accepted the risk: trust the URL's base domain for the session.
    /// Returns the domain that was trusted, `None` when the URL has no host
    /// or its base domain is a bare registry suffix.
    pub fn proceed_to(&self, url: &str) -> Option<String> {
        let domain = base_domain(url)?;
        if !SessionTrustStore::is_trustable(&domain) {
            return None;
        }
        self.trust_domain_for_session(&domain);
        Some(domain)
    }

    pub fn trust_domain_for_session(&self, domain: &str) {
        self.matcher.session().trust(domain);
    }

    pub fn clear_session_trust(&self) {
        self.matcher.session().clear();
    }

    pub fn list_session_trust(&self) -> Vec<String> {
        self.matcher.session().list()
    }

    pub fn session_trust_entries(&self) -> Vec<TrustEntry> {
        self.matcher.session().entries()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ScanService {
        let dir = std::env::temp_dir().join("phish-scan-missing-models");
        ScanService::new(EngineConfig::with_model_dir(dir))
    }

    #[test]
    fn test_proceed_trusts_base_domain() {
        let service = service();
        assert_eq!(
            service.proceed_to("https://shop.kaskus.co.id/item/1"),
            Some("kaskus.co.id".to_string())
        );
        assert!(service.is_trusted("forum.kaskus.co.id"));
        assert!(service.should_skip("https://kaskus.co.id/"));
        assert_eq!(service.list_session_trust(), vec!["kaskus.co.id".to_string()]);
    }

    #[test]
    fn test_proceed_without_host() {
        let service = service();
        assert_eq!(service.proceed_to("not a url"), None);
        assert!(service.list_session_trust().is_empty());
    }

    #[test]
    fn test_proceed_to_registry_suffix_trusts_nothing() {
        let service = service();
        assert_eq!(service.proceed_to("https://co.id/"), None);
        assert_eq!(service.proceed_to("http://localhost:8080/"), None);
        assert!(service.list_session_trust().is_empty());

        assert_eq!(
            service.proceed_to("https://login.evil.com./verify"),
            Some("evil.com".to_string())
        );
        assert!(!service.is_trusted("mybank.com"));
    }

    #[test]
    fn test_clear_session_trust() {
        let service = service();
        service.trust_domain_for_session("www.example.org");
        assert!(service.is_trusted("example.org"));

        service.clear_session_trust();
        assert!(!service.is_trusted("example.org"));
        assert!(service.session_trust_entries().is_empty());
    }

    #[test]
    fn test_shared_session() {
        let session = SessionTrustStore::new();
        let store = Arc::new(ModelStore::new(EngineConfig::default()));
        let a = ScanService::with_store(store.clone(), session.clone());
        let b = ScanService::with_store(store, session);

        a.trust_domain_for_session("example.net");
        assert!(b.is_trusted("www.example.net"));
    }

    #[tokio::test]
    async fn test_unparsable_url_is_rejected() {
        let err = service().scan("::::", None).await.unwrap_err();
        assert!(matches!(err, ScanError::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_neural_model_fails_scan() {
        let err = service().score("https://example.com/", None).await.unwrap_err();
        assert!(matches!(err, ScanError::ScoringFailure(_)));
    }
}
