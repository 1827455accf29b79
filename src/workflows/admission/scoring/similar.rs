use super::super::domain::{HistoricalCase, PriorityKind};
use super::config::ScoringConfig;

/// Rank historical cases by similarity to the current request and cap the list.
///
/// Similarity is a pure scored key: exact priority match plus linearly decaying
/// recency over the lookback window. Outcomes are deliberately kept diverse so the
/// presentation layer can show both positive and negative precedents.
pub(crate) fn rank_cases(
    cases: &[HistoricalCase],
    priority: PriorityKind,
    as_of_year: i32,
    config: &ScoringConfig,
) -> Vec<HistoricalCase> {
    let mut keyed: Vec<(f64, HistoricalCase)> = cases
        .iter()
        .map(|case| (similarity(case, priority, as_of_year, config), case.clone()))
        .collect();

    keyed.sort_by(|(left_key, left), (right_key, right)| {
        right_key
            .partial_cmp(left_key)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| right.year.cmp(&left.year))
    });

    keyed
        .into_iter()
        .take(config.similar_case_cap)
        .map(|(_, case)| case)
        .collect()
}

fn similarity(
    case: &HistoricalCase,
    priority: PriorityKind,
    as_of_year: i32,
    config: &ScoringConfig,
) -> f64 {
    let priority_match = if case.priority == priority {
        config.priority_match_weight
    } else {
        0.0
    };

    let age_years = (as_of_year - case.year).max(0);
    let recency = (1.0 - f64::from(age_years) / f64::from(config.lookback_years)).clamp(0.0, 1.0);

    priority_match + config.recency_weight * recency
}
