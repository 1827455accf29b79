use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::super::domain::{
    AgeClass, CompetitionStats, FactorId, FactorScore, QueueEstimate, ScoreRequest,
    SeasonalWindow, TurnoverStats,
};
use super::config::ScoringConfig;

/// Run all five factor scorers, producing exactly one entry per factor id.
///
/// Missing source data never fails a scorer; it falls back to the neutral default
/// tagged `Estimated` so the confidence estimate can account for it.
pub(crate) fn score_all(
    request: &ScoreRequest,
    facility_turnover: Option<&TurnoverStats>,
    facility_competition: Option<&CompetitionStats>,
    facility_seasonal: Option<&SeasonalWindow>,
    facility_queue: Option<&QueueEstimate>,
    as_of: NaiveDate,
    config: &ScoringConfig,
) -> BTreeMap<FactorId, FactorScore> {
    let mut scores = BTreeMap::new();
    scores.insert(
        FactorId::TurnoverRate,
        turnover_rate(facility_turnover, request.target_class, config),
    );
    scores.insert(
        FactorId::RegionalCompetition,
        regional_competition(facility_competition, request.target_class, config),
    );
    scores.insert(FactorId::PriorityBonus, priority_bonus(request, config));
    scores.insert(
        FactorId::SeasonalFit,
        seasonal_fit(facility_seasonal, as_of, config),
    );
    scores.insert(
        FactorId::WaitlistPosition,
        waitlist_position(facility_queue, request.target_class, config),
    );
    scores
}

/// Score rises with the facility's month-over-month vacancy creation for the class.
fn turnover_rate(
    stats: Option<&TurnoverStats>,
    class: AgeClass,
    config: &ScoringConfig,
) -> FactorScore {
    match stats.and_then(|stats| stats.for_class(class)) {
        Some(rate) => FactorScore::Measured((rate * config.turnover_scale).clamp(0.0, 100.0)),
        None => FactorScore::Estimated(config.neutral_score),
    }
}

/// Inverse of the applicants-per-seat ratio in the facility's service area.
fn regional_competition(
    stats: Option<&CompetitionStats>,
    class: AgeClass,
    config: &ScoringConfig,
) -> FactorScore {
    match stats.and_then(|stats| stats.for_class(class)) {
        Some((applicants, seats)) => {
            let ratio = f64::from(applicants) / f64::from(seats.max(1));
            let score = if ratio <= 1.0 { 100.0 } else { 100.0 / ratio };
            FactorScore::Measured(score.clamp(0.0, 100.0))
        }
        None => FactorScore::Estimated(config.neutral_score),
    }
}

/// Point-table lookup over the union of primary and additional classifications.
///
/// Set semantics: an overlapping category contributes its points once.
fn priority_bonus(request: &ScoreRequest, config: &ScoringConfig) -> FactorScore {
    let mut classifications = request.additional_priorities.clone();
    classifications.insert(request.priority);

    let total: f64 = classifications
        .iter()
        .map(|priority| config.priority_points(*priority))
        .sum();

    FactorScore::Measured(total.clamp(0.0, 100.0))
}

/// Calendar proximity to the facility's next enrollment opening.
///
/// The two months leading into a window score highest; mid-cycle requests trail off.
fn seasonal_fit(
    window: Option<&SeasonalWindow>,
    as_of: NaiveDate,
    config: &ScoringConfig,
) -> FactorScore {
    let months = match window {
        Some(window) if !window.enrollment_months.is_empty() => &window.enrollment_months,
        _ => return FactorScore::Estimated(config.neutral_score),
    };

    let current = as_of.month();
    let months_until_opening = months
        .iter()
        .map(|month| (month + 12 - current) % 12)
        .min()
        .unwrap_or(0);

    let score = match months_until_opening {
        1 | 2 => 95.0,
        0 => 80.0,
        3 | 4 => 65.0,
        5 | 6 => 50.0,
        _ => 35.0,
    };
    FactorScore::Measured(score)
}

/// Inverse of the estimated queue position relative to annual seat turnover.
fn waitlist_position(
    queue: Option<&QueueEstimate>,
    class: AgeClass,
    config: &ScoringConfig,
) -> FactorScore {
    match queue.and_then(|queue| queue.for_class(class)) {
        Some((position, turnover)) if turnover > 0 => {
            let turnover = f64::from(turnover);
            let score = 100.0 * turnover / (turnover + f64::from(position));
            FactorScore::Measured(score.clamp(0.0, 100.0))
        }
        _ => FactorScore::Estimated(config.neutral_score),
    }
}
