//! Risk Pipeline
//!
//! extract → standardize → neural + forest → fuse → calibrate.
//! The only suspension points are parameter loading and the neural call.

use std::sync::Arc;
use std::time::Instant;

use url::Url;

use crate::error::{ScanError, ScanResult};
use crate::logic::config::EngineConfig;
use crate::logic::features::{FeatureExtractor, FeatureLayout, FEATURE_VERSION};
use crate::logic::model::{
    check_probability, normalize, EngineStatus, ForestPrediction, InferenceStats, ModelStore,
    VotingStats,
};
use crate::logic::threat::{calibrate_detailed, fuse, to_percentage, RiskBand, ScanReport};

pub struct RiskPipeline {
    store: Arc<ModelStore>,
    extractor: FeatureExtractor,
    stats: InferenceStats,
}

impl RiskPipeline {
    /// Pipeline that loads every blob from `config.model_dir` on first use
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(Arc::new(ModelStore::new(config)))
    }

    pub fn with_store(store: Arc<ModelStore>) -> Self {
        let extractor = FeatureExtractor::new(store.config().content_min_len);
        Self {
            store,
            extractor,
            stats: InferenceStats::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        self.store.config()
    }

    pub fn store(&self) -> &Arc<ModelStore> {
        &self.store
    }

    /// Calibrated phishing score in [0.02, 0.98]
    pub async fn score(&self, url: &str, html: Option<&str>) -> ScanResult<f64> {
        Ok(self.scan(url, html).await?.score)
    }

    /// Run the full pipeline and keep every intermediate result
    pub async fn scan(&self, url: &str, html: Option<&str>) -> ScanResult<ScanReport> {
        Url::parse(url)?;
        log::info!("Analyzing: {}", url);

        let aux = self.store.aux().await;
        let scorer = self.store.neural().await.map_err(into_scoring_failure)?;

        // ---- neural path ----
        let features = self.extractor.extract(url, html.unwrap_or(""));
        features
            .validate(FeatureLayout::Full)
            .map_err(|e| ScanError::ScoringFailure(e.to_string()))?;
        log::debug!("Features extracted: {}", features.len());

        let standardized = normalize(&features, aux.scaler.as_ref());

        let started = Instant::now();
        let legit = scorer
            .predict_legit(standardized.as_slice())
            .await
            .and_then(check_probability)
            .map_err(into_scoring_failure)?;
        self.stats.record(started.elapsed().as_micros() as u64);

        let lr_score = 1.0 - legit;
        log::debug!("LR ({}) score: {:.4}", scorer.name(), lr_score);

        // ---- forest path ----
        let hybrid = self.config().hybrid;
        let forest: Option<ForestPrediction> = match aux.forest.as_ref() {
            Some(model) if hybrid.rf_enabled => {
                let url_only = self.extractor.extract_url_only(url);
                let prediction = model.predict(url_only.as_slice());
                log::debug!(
                    "RF score: {:.4}, confidence: {:.4}",
                    prediction.score,
                    prediction.confidence
                );
                Some(prediction)
            }
            _ => None,
        };

        // ---- fuse + calibrate ----
        let fusion = fuse(lr_score, forest.as_ref(), &hybrid);
        let calibration = calibrate_detailed(fusion.score, url);
        let score = calibration.score;
        let percentage = to_percentage(score);
        let band = RiskBand::from_percentage(percentage);

        log::info!(
            "Final calibrated score: {:.4} ({}%, {}) via {}",
            score,
            percentage,
            band,
            fusion.decision.as_str()
        );

        Ok(ScanReport {
            url: url.to_string(),
            lr_score,
            forest,
            fusion,
            calibration,
            score,
            percentage,
            band,
            feature_version: FEATURE_VERSION,
            scanned_at: chrono::Utc::now(),
        })
    }

    /// Per-tree votes for a URL; `ModelUnavailable` without a forest
    pub async fn voting_stats(&self, url: &str) -> ScanResult<VotingStats> {
        let aux = self.store.aux().await;
        let model = aux
            .forest
            .as_ref()
            .ok_or_else(|| ScanError::ModelUnavailable("forest not loaded".to_string()))?;
        model.voting_stats(self.extractor.extract_url_only(url).as_slice())
    }

    /// Diagnostic snapshot; does not trigger any load
    pub fn status(&self) -> EngineStatus {
        let (neural_loaded, aux) = self.store.peek();
        let forest_trees = aux
            .as_ref()
            .and_then(|a| a.forest.as_ref().map(|f| f.trees.len()))
            .unwrap_or(0);
        let scaler_loaded = aux.as_ref().map(|a| a.scaler.is_some()).unwrap_or(false);

        EngineStatus {
            model_loaded: neural_loaded,
            model_name: self.config().neural_file.clone(),
            forest_trees,
            scaler_loaded,
            rf_enabled: self.config().hybrid.rf_enabled,
            feature_version: FEATURE_VERSION,
            avg_latency_ms: self.stats.avg_latency_ms(),
            inference_count: self.stats.count(),
        }
    }
}

/// The neural path is mandatory: any failure on it is a scoring failure
fn into_scoring_failure(err: ScanError) -> ScanError {
    match err {
        ScanError::ScoringFailure(msg) => ScanError::ScoringFailure(msg),
        other => ScanError::ScoringFailure(other.to_string()),
    }
}
