//! Hybrid Fusion
//!
//! Reconcile the neural score with the forest vote. The neural scorer is
//! always the majority voice; the forest only nudges.

use super::rules::*;
use super::types::{FusionDecision, FusionOutcome};
use crate::logic::config::HybridConfig;
use crate::logic::model::ForestPrediction;

/// Fuse a neural P(phishing) with an optional forest prediction.
///
/// With the forest disabled or absent the neural score passes through
/// unchanged.
pub fn fuse(lr_score: f64, forest: Option<&ForestPrediction>, config: &HybridConfig) -> FusionOutcome {
    let lr_confidence = (lr_score - DECISION_THRESHOLD).abs() * 2.0;

    let rf = match forest {
        Some(rf) if config.rf_enabled => rf,
        _ => {
            log::debug!("[Hybrid] Using LR score only ({:.4})", lr_score);
            return FusionOutcome {
                score: lr_score,
                decision: FusionDecision::LrOnly,
                lr_weight: 1.0,
                lr_confidence,
            };
        }
    };

    let rf_score = rf.score;
    let lr_phishing = lr_score > DECISION_THRESHOLD;
    let rf_phishing = rf_score > DECISION_THRESHOLD;

    let (decision, lr_weight) = if lr_phishing == rf_phishing {
        (FusionDecision::Agreed, AGREE_LR_WEIGHT)
    } else {
        let rf_extreme = rf_score > RF_EXTREME_HIGH || rf_score < RF_EXTREME_LOW;
        if rf_extreme && (lr_score - rf_score).abs() > RF_EXTREME_GAP {
            (FusionDecision::DisagreedTrustLr, DISTRUST_RF_LR_WEIGHT)
        } else {
            (FusionDecision::DisagreedFavorLr, DISAGREE_LR_WEIGHT)
        }
    };

    let score = lr_score * lr_weight + rf_score * (1.0 - lr_weight);

    log::debug!(
        "[Hybrid] LR: {:.4} (conf: {:.4}), RF: {:.4} (conf: {:.4}) -> {} = {:.4}",
        lr_score,
        lr_confidence,
        rf_score,
        rf.confidence,
        decision.as_str(),
        score
    );

    FusionOutcome {
        score,
        decision,
        lr_weight,
        lr_confidence,
    }
}
