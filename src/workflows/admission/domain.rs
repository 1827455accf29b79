use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Identifier wrapper for childcare facilities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FacilityId(pub String);

/// Identifier wrapper for the child a request is scored for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildId(pub String);

/// The six ordered enrollment age bands used by municipal childcare intake.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AgeClass {
    Age0,
    Age1,
    Age2,
    Age3,
    Age4,
    Age5,
}

impl AgeClass {
    pub const fn label(self) -> &'static str {
        match self {
            AgeClass::Age0 => "0-year class",
            AgeClass::Age1 => "1-year class",
            AgeClass::Age2 => "2-year class",
            AgeClass::Age3 => "3-year class",
            AgeClass::Age4 => "4-year class",
            AgeClass::Age5 => "5-year class",
        }
    }
}

/// Applicant priority classifications recognized by the intake rubric.
///
/// `None` is the sentinel for households without a recognized classification; it is
/// valid as the primary classification but never as an additional one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PriorityKind {
    None,
    DualIncome,
    SingleParent,
    MultiChild,
    SiblingEnrolled,
    HouseholdDisability,
    WelfareRecipient,
}

impl PriorityKind {
    pub const fn label(self) -> &'static str {
        match self {
            PriorityKind::None => "none",
            PriorityKind::DualIncome => "dual-income household",
            PriorityKind::SingleParent => "single-parent household",
            PriorityKind::MultiChild => "multi-child family",
            PriorityKind::SiblingEnrolled => "sibling already enrolled",
            PriorityKind::HouseholdDisability => "household member with disability",
            PriorityKind::WelfareRecipient => "welfare recipient",
        }
    }
}

/// Immutable scoring request naming the facility, child, and priority context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub facility_id: FacilityId,
    pub child_id: ChildId,
    pub target_class: AgeClass,
    pub priority: PriorityKind,
    #[serde(default)]
    pub additional_priorities: BTreeSet<PriorityKind>,
}

impl ScoreRequest {
    /// Check the structural invariant: the additional set repeats neither the primary
    /// classification nor the `none` sentinel.
    pub fn validate(&self) -> Result<(), InvalidRequest> {
        if self.additional_priorities.contains(&PriorityKind::None) {
            return Err(InvalidRequest::NoneAsAdditional);
        }
        if self.priority != PriorityKind::None
            && self.additional_priorities.contains(&self.priority)
        {
            return Err(InvalidRequest::DuplicatePrimary(self.priority));
        }
        Ok(())
    }
}

/// Malformed request input; the caller's fault and never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRequest {
    #[error("additional priorities must not include the `none` sentinel")]
    NoneAsAdditional,
    #[error("additional priorities must not repeat the primary classification ({})", .0.label())]
    DuplicatePrimary(PriorityKind),
}

/// Outcome recorded for a past admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    Admitted,
    Waiting,
    Withdrawn,
}

/// A past admission attempt at the facility (or its comparable group).
///
/// Sourced externally and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalCase {
    pub priority: PriorityKind,
    pub waiting_months: u32,
    pub outcome: CaseOutcome,
    pub year: i32,
}

/// Vacancy-creation history per age class: average seats opened per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverStats {
    pub monthly_vacancies: BTreeMap<AgeClass, f64>,
}

impl TurnoverStats {
    pub fn for_class(&self, class: AgeClass) -> Option<f64> {
        self.monthly_vacancies.get(&class).copied()
    }
}

/// Trailing-window demand in the facility's service area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionStats {
    pub applicants: BTreeMap<AgeClass, u32>,
    pub open_seats: BTreeMap<AgeClass, u32>,
}

impl CompetitionStats {
    pub fn for_class(&self, class: AgeClass) -> Option<(u32, u32)> {
        let applicants = self.applicants.get(&class).copied()?;
        let seats = self.open_seats.get(&class).copied()?;
        Some((applicants, seats))
    }
}

/// Calendar months (1-12) in which the facility opens enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalWindow {
    pub enrollment_months: BTreeSet<u32>,
}

/// Estimated queue position and annual seat turnover per age class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEstimate {
    pub positions: BTreeMap<AgeClass, u32>,
    pub annual_turnover: BTreeMap<AgeClass, u32>,
}

impl QueueEstimate {
    pub fn for_class(&self, class: AgeClass) -> Option<(u32, u32)> {
        let position = self.positions.get(&class).copied()?;
        let turnover = self.annual_turnover.get(&class).copied()?;
        Some((position, turnover))
    }
}

/// Facility context resolved by the metadata collaborator.
///
/// Each stats block is optional; a missing block degrades the matching factor to its
/// neutral default rather than failing the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityMetadata {
    pub facility_id: FacilityId,
    pub name: String,
    #[serde(default)]
    pub turnover: Option<TurnoverStats>,
    #[serde(default)]
    pub competition: Option<CompetitionStats>,
    #[serde(default)]
    pub seasonal: Option<SeasonalWindow>,
    #[serde(default)]
    pub queue: Option<QueueEstimate>,
}

/// The five scored dimensions contributing to admission probability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FactorId {
    TurnoverRate,
    RegionalCompetition,
    PriorityBonus,
    SeasonalFit,
    WaitlistPosition,
}

impl FactorId {
    pub const ALL: [FactorId; 5] = [
        FactorId::TurnoverRate,
        FactorId::RegionalCompetition,
        FactorId::PriorityBonus,
        FactorId::SeasonalFit,
        FactorId::WaitlistPosition,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FactorId::TurnoverRate => "turnover rate",
            FactorId::RegionalCompetition => "regional competition",
            FactorId::PriorityBonus => "priority bonus",
            FactorId::SeasonalFit => "seasonal fit",
            FactorId::WaitlistPosition => "waitlist position",
        }
    }
}

/// A factor's normalized 0-100 score, tagged by whether its source data was present.
///
/// `Estimated` marks the documented neutral fallback for missing data so the
/// confidence estimate can penalize it without a boolean side-channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FactorScore {
    Measured(f64),
    Estimated(f64),
}

impl FactorScore {
    pub const fn value(self) -> f64 {
        match self {
            FactorScore::Measured(score) | FactorScore::Estimated(score) => score,
        }
    }

    pub const fn is_estimated(self) -> bool {
        matches!(self, FactorScore::Estimated(_))
    }
}

/// Per-factor entry in the assembled result: score, engine-configured weight, and the
/// estimated flag surfaced for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub score: f64,
    pub weight: f64,
    pub estimated: bool,
}
