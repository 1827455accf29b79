use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::admission::domain::{
    AgeClass, CaseOutcome, ChildId, CompetitionStats, FacilityId, FacilityMetadata,
    HistoricalCase, PriorityKind, QueueEstimate, ScoreRequest, SeasonalWindow, TurnoverStats,
};
use crate::workflows::admission::providers::{
    FacilityHistoryProvider, FacilityMetadataProvider, ProviderError,
};
use crate::workflows::admission::scoring::{ScoringConfig, ScoringContext, ScoringEngine};
use crate::workflows::admission::{admission_router, AdmissionScoreService};

pub(super) fn scoring_config() -> ScoringConfig {
    ScoringConfig::default()
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(scoring_config())
}

/// Mid-February evaluation date: two months before the April enrollment window.
pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 15).expect("valid date")
}

pub(super) fn request(priority: PriorityKind) -> ScoreRequest {
    ScoreRequest {
        facility_id: FacilityId("fac-001".to_string()),
        child_id: ChildId("child-042".to_string()),
        target_class: AgeClass::Age1,
        priority,
        additional_priorities: BTreeSet::new(),
    }
}

pub(super) fn request_with_additional(
    priority: PriorityKind,
    additional: &[PriorityKind],
) -> ScoreRequest {
    let mut request = request(priority);
    request.additional_priorities = additional.iter().copied().collect();
    request
}

/// Facility with every stats block populated and favorable to the applicant.
pub(super) fn full_metadata() -> FacilityMetadata {
    FacilityMetadata {
        facility_id: FacilityId("fac-001".to_string()),
        name: "Sakura Nursery".to_string(),
        turnover: Some(TurnoverStats {
            monthly_vacancies: BTreeMap::from([(AgeClass::Age1, 2.5)]),
        }),
        competition: Some(CompetitionStats {
            applicants: BTreeMap::from([(AgeClass::Age1, 10)]),
            open_seats: BTreeMap::from([(AgeClass::Age1, 9)]),
        }),
        seasonal: Some(SeasonalWindow {
            enrollment_months: BTreeSet::from([4]),
        }),
        queue: Some(QueueEstimate {
            positions: BTreeMap::from([(AgeClass::Age1, 3)]),
            annual_turnover: BTreeMap::from([(AgeClass::Age1, 18)]),
        }),
    }
}

/// Facility known by name only: every stats block missing.
pub(super) fn bare_metadata() -> FacilityMetadata {
    FacilityMetadata {
        facility_id: FacilityId("fac-001".to_string()),
        name: "Sakura Nursery".to_string(),
        turnover: None,
        competition: None,
        seasonal: None,
        queue: None,
    }
}

fn case(priority: PriorityKind, waiting_months: u32, outcome: CaseOutcome, year: i32) -> HistoricalCase {
    HistoricalCase {
        priority,
        waiting_months,
        outcome,
        year,
    }
}

/// Eight recent cases, six admitted with a median wait of two months, five of them
/// matching the dual-income priority exactly.
pub(super) fn strong_history() -> Vec<HistoricalCase> {
    vec![
        case(PriorityKind::DualIncome, 1, CaseOutcome::Admitted, 2025),
        case(PriorityKind::DualIncome, 2, CaseOutcome::Admitted, 2025),
        case(PriorityKind::DualIncome, 2, CaseOutcome::Admitted, 2024),
        case(PriorityKind::DualIncome, 3, CaseOutcome::Admitted, 2024),
        case(PriorityKind::DualIncome, 4, CaseOutcome::Admitted, 2023),
        case(PriorityKind::SingleParent, 1, CaseOutcome::Admitted, 2025),
        case(PriorityKind::MultiChild, 9, CaseOutcome::Waiting, 2025),
        case(PriorityKind::None, 0, CaseOutcome::Withdrawn, 2024),
    ]
}

pub(super) fn context(facility: FacilityMetadata, cases: Vec<HistoricalCase>) -> ScoringContext {
    ScoringContext {
        facility,
        cases,
        as_of: as_of(),
    }
}

#[derive(Default)]
pub(super) struct MemoryMetadataProvider {
    facilities: HashMap<FacilityId, FacilityMetadata>,
}

impl MemoryMetadataProvider {
    pub(super) fn with(metadata: FacilityMetadata) -> Self {
        let mut facilities = HashMap::new();
        facilities.insert(metadata.facility_id.clone(), metadata);
        Self { facilities }
    }
}

impl FacilityMetadataProvider for MemoryMetadataProvider {
    fn get(&self, facility_id: &FacilityId) -> Result<FacilityMetadata, ProviderError> {
        self.facilities
            .get(facility_id)
            .cloned()
            .ok_or(ProviderError::NotFound)
    }
}

#[derive(Default)]
pub(super) struct MemoryHistoryProvider {
    cases: Vec<HistoricalCase>,
}

impl MemoryHistoryProvider {
    pub(super) fn with(cases: Vec<HistoricalCase>) -> Self {
        Self { cases }
    }
}

impl FacilityHistoryProvider for MemoryHistoryProvider {
    fn get_cases(
        &self,
        _facility_id: &FacilityId,
        _target_class: AgeClass,
    ) -> Result<Vec<HistoricalCase>, ProviderError> {
        Ok(self.cases.clone())
    }
}

pub(super) struct UnavailableMetadataProvider;

impl FacilityMetadataProvider for UnavailableMetadataProvider {
    fn get(&self, _facility_id: &FacilityId) -> Result<FacilityMetadata, ProviderError> {
        Err(ProviderError::Unavailable("registry offline".to_string()))
    }
}

pub(super) struct TimeoutHistoryProvider;

impl FacilityHistoryProvider for TimeoutHistoryProvider {
    fn get_cases(
        &self,
        _facility_id: &FacilityId,
        _target_class: AgeClass,
    ) -> Result<Vec<HistoricalCase>, ProviderError> {
        Err(ProviderError::Timeout)
    }
}

pub(super) fn build_service(
    metadata: FacilityMetadata,
    cases: Vec<HistoricalCase>,
) -> AdmissionScoreService<MemoryMetadataProvider, MemoryHistoryProvider> {
    AdmissionScoreService::new(
        Arc::new(MemoryMetadataProvider::with(metadata)),
        Arc::new(MemoryHistoryProvider::with(cases)),
        scoring_config(),
    )
}

pub(super) fn admission_router_with_service(
    service: AdmissionScoreService<MemoryMetadataProvider, MemoryHistoryProvider>,
) -> axum::Router {
    admission_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
