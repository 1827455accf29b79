//! Admission probability scoring for childcare facility applications.
//!
//! Given a child's attributes, a target facility, and a priority classification, the
//! engine produces a probability of admission, a letter grade, a confidence level, an
//! estimated wait, comparable historical cases, and actionable recommendations.
//! Facility metadata and admission history arrive through collaborator traits;
//! partial data lowers confidence but never blocks an answer.

pub mod domain;
pub mod history_csv;
pub mod providers;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AgeClass, CaseOutcome, ChildId, CompetitionStats, FacilityId, FacilityMetadata,
    FactorBreakdown, FactorId, FactorScore, HistoricalCase, InvalidRequest, PriorityKind,
    QueueEstimate, ScoreRequest, SeasonalWindow, TurnoverStats,
};
pub use history_csv::{CsvHistoryProvider, HistoryImportError};
pub use providers::{
    EmptyHistoryProvider, FacilityHistoryProvider, FacilityMetadataProvider,
    JsonMetadataProvider, MetadataImportError, ProviderError,
};
pub use router::admission_router;
pub use scoring::{
    FactorWeights, Grade, ScoreResult, ScoringConfig, ScoringContext, ScoringEngine,
};
pub use service::{AdmissionScoreError, AdmissionScoreService};
