//! Feature Vector - Core data structure for ML input
//!
//! **Versioned feature vector with layout validation**
//!
//! Length is fixed by the layout (50 or 22) and every slot is finite.
//! Once handed out by the extractor a vector is never modified.

use serde::{Deserialize, Serialize};

use super::layout::{validate_layout, FeatureLayout, LayoutMismatchError, FEATURE_VERSION};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Which layout the values follow
    pub layout: FeatureLayout,
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    values: Vec<f64>,
}

impl FeatureVector {
    /// All-zero vector: the "indeterminate" result for unparsable input
    pub fn zeroed(layout: FeatureLayout) -> Self {
        Self {
            layout,
            version: FEATURE_VERSION,
            layout_hash: layout.hash(),
            values: vec![0.0; layout.len()],
        }
    }

    /// Create from raw values; truncates or zero-pads to the layout length
    /// and replaces non-finite entries with 0.
    pub fn from_values(layout: FeatureLayout, values: Vec<f64>) -> Self {
        let mut values: Vec<f64> = values
            .into_iter()
            .take(layout.len())
            .map(|v| if v.is_finite() { v } else { 0.0 })
            .collect();
        values.resize(layout.len(), 0.0);

        Self {
            layout,
            version: FEATURE_VERSION,
            layout_hash: layout.hash(),
            values,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        self.layout.index_of(name).and_then(|i| self.get(i))
    }

    /// True for the fail-closed output of an unparsable URL
    pub fn is_all_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    /// Validate that this vector is compatible with the expected layout
    pub fn validate(&self, expected: FeatureLayout) -> Result<(), LayoutMismatchError> {
        validate_layout(expected, self.version, self.layout_hash)?;
        if self.values.len() != expected.len() {
            return Err(LayoutMismatchError {
                expected,
                expected_hash: expected.hash(),
                actual_version: self.version,
                actual_hash: self.layout_hash,
            });
        }
        Ok(())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "layout": self.layout.as_str(),
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": self.layout.names().iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
