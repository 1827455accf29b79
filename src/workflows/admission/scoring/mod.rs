mod aggregate;
mod config;
mod confidence;
mod factors;
mod grade;
mod recommend;
mod similar;

pub use config::{FactorWeights, ScoringConfig};
pub use grade::Grade;

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{
    CaseOutcome, FacilityMetadata, FactorBreakdown, FactorId, HistoricalCase, QueueEstimate,
    ScoreRequest,
};

/// Externally resolved inputs for one scoring pass: facility context, the raw case
/// history for the facility and class, and the evaluation date.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringContext {
    pub facility: FacilityMetadata,
    pub cases: Vec<HistoricalCase>,
    pub as_of: NaiveDate,
}

/// Assembled scoring output. Created fresh per request; the engine keeps no cache
/// and callers own any persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub facility_name: String,
    pub grade: Grade,
    pub probability: f64,
    pub confidence: f64,
    pub estimated_months: u32,
    pub factors: BTreeMap<FactorId, FactorBreakdown>,
    pub similar_cases: Vec<HistoricalCase>,
    pub recommendations: Vec<String>,
}

/// Stateless, single-shot orchestrator over the factor scorers, case retriever,
/// aggregator, confidence estimator, grade bander, and recommendation generator.
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        debug_assert!(config.weights.validate(), "factor weights must sum to 1.0");
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one request against resolved facility context.
    ///
    /// Pure over its inputs: identical request and context yield an identical
    /// result. Assembly is atomic; no partial result ever escapes.
    pub fn score(&self, request: &ScoreRequest, context: &ScoringContext) -> ScoreResult {
        let facility = &context.facility;
        let scores = factors::score_all(
            request,
            facility.turnover.as_ref(),
            facility.competition.as_ref(),
            facility.seasonal.as_ref(),
            facility.queue.as_ref(),
            context.as_of,
            &self.config,
        );

        let as_of_year = context.as_of.year();
        let similar_cases =
            similar::rank_cases(&context.cases, request.priority, as_of_year, &self.config);

        let probability = aggregate::combine(&scores, &self.config.weights)
            .unwrap_or(self.config.neutral_score);

        let estimated_factors = scores.values().filter(|score| score.is_estimated()).count();
        let freshest_case_year = similar_cases.iter().map(|case| case.year).max();
        let confidence = confidence::estimate(
            estimated_factors,
            similar_cases.len(),
            freshest_case_year,
            as_of_year,
            &self.config,
        );

        let grade = grade::assign(probability, confidence, &self.config);

        let estimated_months = estimate_wait(
            &similar_cases,
            facility.queue.as_ref(),
            request,
            &self.config,
        );

        let recommendations = recommend::build(
            &scores,
            grade,
            &similar_cases,
            estimated_months,
            &self.config,
        );

        let factors = scores
            .into_iter()
            .map(|(factor, score)| {
                let breakdown = FactorBreakdown {
                    score: score.value(),
                    weight: self.config.weights.weight(factor),
                    estimated: score.is_estimated(),
                };
                (factor, breakdown)
            })
            .collect();

        ScoreResult {
            facility_name: facility.name.clone(),
            grade,
            probability,
            confidence,
            estimated_months,
            factors,
            similar_cases,
            recommendations,
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Estimated months until a seat: median wait of admitted similar cases, falling
/// back to the queue estimate, then the configured default.
fn estimate_wait(
    similar_cases: &[HistoricalCase],
    queue: Option<&QueueEstimate>,
    request: &ScoreRequest,
    config: &ScoringConfig,
) -> u32 {
    let mut admitted_waits: Vec<u32> = similar_cases
        .iter()
        .filter(|case| case.outcome == CaseOutcome::Admitted)
        .map(|case| case.waiting_months)
        .collect();

    if !admitted_waits.is_empty() {
        admitted_waits.sort_unstable();
        return admitted_waits[admitted_waits.len() / 2];
    }

    if let Some((position, turnover)) = queue.and_then(|queue| queue.for_class(request.target_class))
    {
        if turnover > 0 {
            let months = (f64::from(position) * 12.0 / f64::from(turnover)).ceil();
            return months as u32;
        }
    }

    config.default_wait_months
}
