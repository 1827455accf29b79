use serde::{Deserialize, Serialize};

use super::super::domain::{FactorId, PriorityKind};

/// Engine-configured weight per factor. Weights are positive and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub turnover_rate: f64,
    pub regional_competition: f64,
    pub priority_bonus: f64,
    pub seasonal_fit: f64,
    pub waitlist_position: f64,
}

impl FactorWeights {
    pub const fn weight(&self, factor: FactorId) -> f64 {
        match factor {
            FactorId::TurnoverRate => self.turnover_rate,
            FactorId::RegionalCompetition => self.regional_competition,
            FactorId::PriorityBonus => self.priority_bonus,
            FactorId::SeasonalFit => self.seasonal_fit,
            FactorId::WaitlistPosition => self.waitlist_position,
        }
    }

    /// Validate that the weights form a convex combination.
    pub fn validate(&self) -> bool {
        let parts = [
            self.turnover_rate,
            self.regional_competition,
            self.priority_bonus,
            self.seasonal_fit,
            self.waitlist_position,
        ];
        let sum: f64 = parts.iter().sum();
        parts.iter().all(|weight| *weight > 0.0) && (sum - 1.0).abs() < 1e-6
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            turnover_rate: 0.25,
            regional_competition: 0.25,
            priority_bonus: 0.20,
            seasonal_fit: 0.15,
            waitlist_position: 0.15,
        }
    }
}

/// Rubric configuration for the scoring engine: weights, thresholds, and decay
/// constants. Passed in explicitly so tests can run alternate rubrics without
/// touching global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: FactorWeights,
    /// Documented fallback score when a factor's source data is missing.
    pub neutral_score: f64,
    /// Score awarded per average monthly vacancy in the target class.
    pub turnover_scale: f64,
    /// Confidence lost per factor that fell back to its neutral default.
    pub estimated_factor_penalty: f64,
    /// Maximum confidence lost for a thin similar-case sample.
    pub case_gap_penalty: f64,
    /// Case count at which the sample bonus reaches half saturation.
    pub case_sample_midpoint: f64,
    /// Freshest-case age beyond which the staleness penalty applies.
    pub stale_case_years: i32,
    pub stale_case_penalty: f64,
    /// Below this confidence the provisional grade drops one band.
    pub low_confidence_threshold: f64,
    /// Factors at or above this score draw no improvement suggestion.
    pub strong_factor_threshold: f64,
    /// At this many estimated factors the advice collapses to a single
    /// insufficient-data message.
    pub sparse_factor_count: usize,
    pub similar_case_cap: usize,
    /// Years of history over which case recency decays linearly to zero.
    pub lookback_years: i32,
    pub priority_match_weight: f64,
    pub recency_weight: f64,
    /// Wait estimate when neither history nor a queue estimate is available.
    pub default_wait_months: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            neutral_score: 50.0,
            turnover_scale: 40.0,
            estimated_factor_penalty: 0.12,
            case_gap_penalty: 0.25,
            case_sample_midpoint: 4.0,
            stale_case_years: 3,
            stale_case_penalty: 0.10,
            low_confidence_threshold: 0.5,
            strong_factor_threshold: 70.0,
            sparse_factor_count: 4,
            similar_case_cap: 10,
            lookback_years: 5,
            priority_match_weight: 3.0,
            recency_weight: 2.0,
            default_wait_months: 6,
        }
    }
}

impl ScoringConfig {
    /// Point value a single priority classification contributes to the bonus factor.
    ///
    /// `dual_income` alone lands exactly on the neutral score so a request with no
    /// facility data at all aggregates to a flat 50.0.
    pub const fn priority_points(&self, priority: PriorityKind) -> f64 {
        match priority {
            PriorityKind::None => 0.0,
            PriorityKind::DualIncome => 50.0,
            PriorityKind::SingleParent => 70.0,
            PriorityKind::MultiChild => 40.0,
            PriorityKind::SiblingEnrolled => 30.0,
            PriorityKind::HouseholdDisability => 60.0,
            PriorityKind::WelfareRecipient => 65.0,
        }
    }
}
