use std::collections::BTreeMap;

use super::super::domain::{FactorId, FactorScore};
use super::config::FactorWeights;

/// Combine the factor scores into a single 0-100 probability.
///
/// Returns `None` only when fewer than the full factor set is supplied; the
/// orchestrator treats that as a programming-contract violation, not a user error.
pub(crate) fn combine(
    scores: &BTreeMap<FactorId, FactorScore>,
    weights: &FactorWeights,
) -> Option<f64> {
    if scores.len() != FactorId::ALL.len() {
        return None;
    }

    let raw: f64 = scores
        .iter()
        .map(|(factor, score)| score.value() * weights.weight(*factor))
        .sum();

    Some(round_one_decimal(raw.clamp(0.0, 100.0)))
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
