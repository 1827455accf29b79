use std::collections::BTreeMap;

use super::super::domain::{CaseOutcome, FactorId, FactorScore, HistoricalCase};
use super::config::ScoringConfig;
use super::grade::Grade;

pub(crate) const INSUFFICIENT_DATA_MESSAGE: &str = "Not enough facility data is available \
for targeted advice; contact the facility or your municipal childcare desk for current \
vacancy information.";

const MAX_RECOMMENDATIONS: usize = 4;

/// Derive 1-4 ordered, human-actionable suggestions from the weakest factors.
///
/// When most factors ran on defaults there is nothing factor-specific worth saying,
/// so the list collapses to the single insufficient-data message. When every factor
/// clears the strong threshold the list is the single next-step message instead;
/// the contract never yields an empty list.
pub(crate) fn build(
    scores: &BTreeMap<FactorId, FactorScore>,
    grade: Grade,
    similar_cases: &[HistoricalCase],
    estimated_months: u32,
    config: &ScoringConfig,
) -> Vec<String> {
    let estimated_count = scores.values().filter(|score| score.is_estimated()).count();
    if estimated_count >= config.sparse_factor_count {
        return vec![INSUFFICIENT_DATA_MESSAGE.to_string()];
    }

    let mut weak: Vec<(f64, FactorId)> = scores
        .iter()
        .filter(|(_, score)| score.value() < config.strong_factor_threshold)
        .map(|(factor, score)| {
            let contribution = score.value() * config.weights.weight(*factor);
            (contribution, *factor)
        })
        .collect();

    if weak.is_empty() {
        return vec![next_step_message(grade, similar_cases)];
    }

    weak.sort_by(|(left, left_factor), (right, right_factor)| {
        left.partial_cmp(right)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| left_factor.cmp(right_factor))
    });

    let mut recommendations: Vec<String> = weak
        .into_iter()
        .map(|(_, factor)| suggestion(factor, estimated_months))
        .collect();
    recommendations.dedup();
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

fn suggestion(factor: FactorId, estimated_months: u32) -> String {
    match factor {
        FactorId::TurnoverRate => "Few seats open up at this facility; add nearby \
            facilities with higher turnover to your application list."
            .to_string(),
        FactorId::RegionalCompetition => "Competition for seats in this service area is \
            heavy; consider listing additional wards or less contested facilities."
            .to_string(),
        FactorId::PriorityBonus => "Your priority classification scores low here; check \
            whether certificates such as proof of employment for both guardians could \
            raise it."
            .to_string(),
        FactorId::SeasonalFit => "The next enrollment window is months away; applying \
            for the April intake usually improves the odds."
            .to_string(),
        FactorId::WaitlistPosition => format!(
            "Your estimated queue position implies a wait of about {estimated_months} \
            month(s); consider interim options such as licensed home care."
        ),
    }
}

fn next_step_message(grade: Grade, similar_cases: &[HistoricalCase]) -> String {
    let admitted = similar_cases
        .iter()
        .filter(|case| case.outcome == CaseOutcome::Admitted)
        .count();

    if admitted > 0 {
        format!(
            "All factors look strong (grade {}); {admitted} comparable household(s) were \
            admitted recently, so submit your documents early and confirm the enrollment \
            window with the facility.",
            grade.label()
        )
    } else {
        format!(
            "All factors look strong (grade {}); submit your documents early and confirm \
            the enrollment window with the facility.",
            grade.label()
        )
    }
}
