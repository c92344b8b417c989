//! Scaler - standardization applied before the neural scorer
//!
//! Parameters come from training (`{ "mean": [...], "std": [...] }`).

use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureLayout, FeatureVector};

/// Per-feature standardization parameters, index-aligned with the full layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl ScalerParams {
    /// Parameters only make sense for the full layout; anything else is
    /// treated as absent by the store.
    pub fn is_valid(&self) -> bool {
        let expected = FeatureLayout::Full.len();
        self.mean.len() == expected
            && self.std.len() == expected
            && self.mean.iter().chain(self.std.iter()).all(|v| v.is_finite())
    }

    fn mean_at(&self, index: usize) -> f64 {
        self.mean.get(index).copied().unwrap_or(0.0)
    }

    /// A zero spread would divide by zero; treat it as unit spread
    fn std_at(&self, index: usize) -> f64 {
        match self.std.get(index).copied() {
            Some(s) if s != 0.0 => s,
            _ => 1.0,
        }
    }
}

/// `(x - mean[i]) / std[i]` elementwise; identity when `params` is absent.
pub fn normalize(vector: &FeatureVector, params: Option<&ScalerParams>) -> FeatureVector {
    let params = match params {
        Some(p) => p,
        None => {
            log::warn!("No scaler params, using raw features");
            return vector.clone();
        }
    };

    let values = vector
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &x)| (x - params.mean_at(i)) / params.std_at(i))
        .collect();

    FeatureVector::from_values(vector.layout, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(mean: f64, std: f64) -> ScalerParams {
        ScalerParams {
            mean: vec![mean; 50],
            std: vec![std; 50],
        }
    }

    #[test]
    fn test_identity_without_params() {
        let v = FeatureVector::from_values(FeatureLayout::Full, vec![3.0; 50]);
        assert_eq!(normalize(&v, None), v);
    }

    #[test]
    fn test_standardizes() {
        let v = FeatureVector::from_values(FeatureLayout::Full, vec![3.0; 50]);
        let out = normalize(&v, Some(&params(1.0, 2.0)));
        assert!(out.as_slice().iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_missing_and_zero_std_fall_back() {
        let v = FeatureVector::from_values(FeatureLayout::Full, vec![4.0; 50]);
        let short = ScalerParams {
            mean: vec![1.0; 10],
            std: vec![0.0; 10],
        };
        let out = normalize(&v, Some(&short));
        assert_eq!(out.get(0), Some(3.0));
        assert_eq!(out.get(49), Some(4.0));
        assert!(!short.is_valid());
        assert!(params(0.0, 1.0).is_valid());
    }
}
