//! Parameter Store - memoized loading of the three blobs
//!
//! Forest and scaler are optional: a failed load degrades to `None` and
//! that outcome is memoized. The neural scorer is mandatory: a failed
//! load is returned to the caller and retried on the next request.
//! Concurrent first callers await one in-flight load.

use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;

use super::forest::RandomForestModel;
use super::inference::NeuralScorer;
use super::scaler::ScalerParams;
use crate::error::{ScanError, ScanResult};
use crate::logic::config::EngineConfig;

/// Optional parameters, fixed once loaded
#[derive(Debug, Default)]
pub struct AuxModels {
    pub forest: Option<RandomForestModel>,
    pub scaler: Option<ScalerParams>,
}

pub struct ModelStore {
    config: EngineConfig,
    aux: OnceCell<Arc<AuxModels>>,
    neural: OnceCell<Arc<dyn NeuralScorer>>,
}

impl ModelStore {
    /// Load everything lazily from `config.model_dir`
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            aux: OnceCell::new(),
            neural: OnceCell::new(),
        }
    }

    /// Use an already constructed neural scorer; forest/scaler still load
    /// lazily from disk.
    pub fn with_scorer(config: EngineConfig, scorer: Arc<dyn NeuralScorer>) -> Self {
        Self {
            config,
            aux: OnceCell::new(),
            neural: OnceCell::new_with(Some(scorer)),
        }
    }

    /// Fully in-memory store, nothing touches disk
    pub fn from_parts(
        config: EngineConfig,
        scorer: Arc<dyn NeuralScorer>,
        forest: Option<RandomForestModel>,
        scaler: Option<ScalerParams>,
    ) -> Self {
        Self {
            config,
            aux: OnceCell::new_with(Some(Arc::new(AuxModels { forest, scaler }))),
            neural: OnceCell::new_with(Some(scorer)),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forest + scaler, loading them on first use
    pub async fn aux(&self) -> Arc<AuxModels> {
        self.aux
            .get_or_init(|| async { Arc::new(self.load_aux().await) })
            .await
            .clone()
    }

    /// Neural scorer, loading it on first use
    pub async fn neural(&self) -> ScanResult<Arc<dyn NeuralScorer>> {
        self.neural
            .get_or_try_init(|| self.load_neural())
            .await
            .cloned()
    }

    /// Loaded state without triggering a load
    pub fn peek(&self) -> (bool, Option<Arc<AuxModels>>) {
        (self.neural.initialized(), self.aux.get().cloned())
    }

    /// Warm every blob up front
    pub async fn preload(&self) -> ScanResult<()> {
        self.aux().await;
        self.neural().await.map(|_| ())
    }

    async fn load_aux(&self) -> AuxModels {
        let forest = if self.config.hybrid.rf_enabled {
            match self.load_forest().await {
                Ok(model) => Some(model),
                Err(e) => {
                    log::warn!("Forest unavailable, continuing without it: {}", e);
                    None
                }
            }
        } else {
            log::info!("Forest disabled by config, skipping load");
            None
        };

        let scaler = match self.load_scaler().await {
            Ok(params) => Some(params),
            Err(e) => {
                log::warn!("Scaler unavailable, features will not be standardized: {}", e);
                None
            }
        };

        AuxModels { forest, scaler }
    }

    async fn load_forest(&self) -> ScanResult<RandomForestModel> {
        let path = self.config.forest_path();
        let bytes = read_blob(&path, self.config.forest_sha256.as_deref()).await?;
        let json = String::from_utf8(bytes)
            .map_err(|e| ScanError::ModelUnavailable(format!("forest blob is not UTF-8: {}", e)))?;
        RandomForestModel::from_json(&json)
    }

    async fn load_scaler(&self) -> ScanResult<ScalerParams> {
        let path = self.config.scaler_path();
        let bytes = read_blob(&path, self.config.scaler_sha256.as_deref()).await?;
        let params: ScalerParams = serde_json::from_slice(&bytes)?;

        if !params.is_valid() {
            return Err(ScanError::ModelUnavailable(format!(
                "scaler params need {} finite means and stds",
                crate::logic::features::FULL_FEATURE_COUNT
            )));
        }

        log::info!("Scaler params loaded from {}", path.display());
        Ok(params)
    }

    async fn load_neural(&self) -> ScanResult<Arc<dyn NeuralScorer>> {
        let path = self.config.neural_path();
        let bytes = read_blob(&path, self.config.neural_sha256.as_deref())
            .await
            .map_err(|e| ScanError::ModelUnavailable(format!("neural weights: {}", e)))?;
        build_neural(&bytes)
    }
}

#[cfg(feature = "onnx")]
fn build_neural(bytes: &[u8]) -> ScanResult<Arc<dyn NeuralScorer>> {
    let scorer = super::inference::OnnxScorer::from_bytes(bytes)?;
    Ok(Arc::new(scorer))
}

#[cfg(not(feature = "onnx"))]
fn build_neural(_bytes: &[u8]) -> ScanResult<Arc<dyn NeuralScorer>> {
    Err(ScanError::ModelUnavailable(
        "built without the `onnx` feature; supply a NeuralScorer".to_string(),
    ))
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Hex SHA-256 of a byte slice
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Read a blob and check it against an expected digest, if any
pub async fn read_blob(path: &Path, expected_sha256: Option<&str>) -> ScanResult<Vec<u8>> {
    let bytes = tokio::fs::read(path).await?;

    if let Some(expected) = expected_sha256 {
        let actual = sha256_hex(&bytes);
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            log::warn!(
                "Checksum mismatch for {}: expected {}, got {}",
                path.display(),
                expected,
                actual
            );
            return Err(ScanError::ModelUnavailable(format!(
                "checksum mismatch for {}",
                path.display()
            )));
        }
    }

    log::debug!("Read {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedScorer(f64);

    #[async_trait]
    impl NeuralScorer for FixedScorer {
        async fn predict_legit(&self, _features: &[f64]) -> ScanResult<f64> {
            Ok(self.0)
        }
    }

    const FOREST_JSON: &str = r#"{"trees":[{"value":[0.8,0.2]}]}"#;

    fn scaler_json() -> String {
        serde_json::json!({ "mean": vec![0.0; 50], "std": vec![1.0; 50] }).to_string()
    }

    #[tokio::test]
    async fn test_loads_optional_blobs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rf_model.json"), FOREST_JSON).unwrap();
        std::fs::write(dir.path().join("scaler_params.json"), scaler_json()).unwrap();

        let store = ModelStore::with_scorer(
            EngineConfig::with_model_dir(dir.path()),
            Arc::new(FixedScorer(0.5)),
        );
        let aux = store.aux().await;
        assert_eq!(aux.forest.as_ref().map(|f| f.trees.len()), Some(1));
        assert!(aux.scaler.is_some());
    }

    #[tokio::test]
    async fn test_missing_optional_blobs_degrade() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::with_scorer(
            EngineConfig::with_model_dir(dir.path()),
            Arc::new(FixedScorer(0.5)),
        );
        let aux = store.aux().await;
        assert!(aux.forest.is_none());
        assert!(aux.scaler.is_none());

        // memoized: a forest written later is not picked up
        std::fs::write(dir.path().join("rf_model.json"), FOREST_JSON).unwrap();
        assert!(store.aux().await.forest.is_none());
    }

    #[tokio::test]
    async fn test_checksum_mismatch_rejects_blob() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rf_model.json"), FOREST_JSON).unwrap();

        let mut config = EngineConfig::with_model_dir(dir.path());
        config.forest_sha256 = Some("00".repeat(32));
        let store = ModelStore::with_scorer(config.clone(), Arc::new(FixedScorer(0.5)));
        assert!(store.aux().await.forest.is_none());

        config.forest_sha256 = Some(sha256_hex(FOREST_JSON.as_bytes()).to_uppercase());
        let store = ModelStore::with_scorer(config, Arc::new(FixedScorer(0.5)));
        assert!(store.aux().await.forest.is_some());
    }

    #[tokio::test]
    async fn test_forest_skipped_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rf_model.json"), FOREST_JSON).unwrap();

        let mut config = EngineConfig::with_model_dir(dir.path());
        config.hybrid.rf_enabled = false;
        let store = ModelStore::with_scorer(config, Arc::new(FixedScorer(0.5)));
        assert!(store.aux().await.forest.is_none());
    }

    #[tokio::test]
    async fn test_missing_neural_is_not_memoized() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(EngineConfig::with_model_dir(dir.path()));

        assert!(matches!(store.neural().await, Err(ScanError::ModelUnavailable(_))));
        assert!(!store.peek().0);
        assert!(store.neural().await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rf_model.json"), FOREST_JSON).unwrap();
        let store = Arc::new(ModelStore::with_scorer(
            EngineConfig::with_model_dir(dir.path()),
            Arc::new(FixedScorer(0.5)),
        ));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.aux().await }));
        }

        let first = store.aux().await;
        for handle in handles {
            assert!(Arc::ptr_eq(&handle.await.unwrap(), &first));
        }
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
