use super::config::ScoringConfig;

/// Estimate how much underlying data supports the probability, in [0, 1].
///
/// Starts from full confidence and applies three independent, monotone adjustments:
/// a linear penalty per defaulted factor, a saturating sample-size term that shrinks
/// the case-gap penalty as history accumulates, and a staleness penalty when the
/// freshest case is past the threshold. An empty sample is treated as infinitely
/// stale so adding any case, however old, never lowers the estimate.
pub(crate) fn estimate(
    estimated_factors: usize,
    case_count: usize,
    freshest_case_year: Option<i32>,
    as_of_year: i32,
    config: &ScoringConfig,
) -> f64 {
    let mut confidence = 1.0;

    confidence -= config.estimated_factor_penalty * estimated_factors as f64;

    let sample = case_count as f64;
    let saturation = sample / (sample + config.case_sample_midpoint);
    confidence -= config.case_gap_penalty * (1.0 - saturation);

    let stale = match freshest_case_year {
        Some(year) => as_of_year - year > config.stale_case_years,
        None => true,
    };
    if stale {
        confidence -= config.stale_case_penalty;
    }

    confidence.clamp(0.0, 1.0)
}
