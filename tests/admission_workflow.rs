//! Integration specifications for the admission scoring workflow.
//!
//! Scenarios drive the file-backed providers, the public service facade, and the HTTP
//! router end to end so we can validate scoring, degradation, and routing without
//! reaching into private modules.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::NaiveDate;
use tower::ServiceExt;

use admission_ai::workflows::admission::{
    admission_router, AdmissionScoreError, AdmissionScoreService, AgeClass, ChildId,
    CsvHistoryProvider, FacilityId, Grade, InvalidRequest, JsonMetadataProvider, PriorityKind,
    ScoreRequest, ScoringConfig,
};

const FACILITIES_JSON: &str = r#"[
  {
    "facility_id": "fac-001",
    "name": "Sakura Nursery",
    "turnover": { "monthly_vacancies": { "age1": 2.5 } },
    "competition": {
      "applicants": { "age1": 10 },
      "open_seats": { "age1": 9 }
    },
    "seasonal": { "enrollment_months": [4] },
    "queue": {
      "positions": { "age1": 3 },
      "annual_turnover": { "age1": 18 }
    }
  },
  {
    "facility_id": "fac-002",
    "name": "Hinode House"
  }
]"#;

const HISTORY_CSV: &str = "\
facility_id,target_class,priority,waiting_months,result,year
fac-001,age1,dual_income,1,admitted,2025
fac-001,age1,dual_income,2,admitted,2025
fac-001,age1,dual_income,2,admitted,2024
fac-001,age1,dual_income,3,admitted,2024
fac-001,age1,dual_income,4,admitted,2023
fac-001,age1,single_parent,1,admitted,2025
fac-001,age1,multi_child,9,waiting,2025
fac-001,age1,none,0,withdrawn,2024
fac-001,age2,dual_income,5,waiting,2025
";

fn build_service() -> AdmissionScoreService<JsonMetadataProvider, CsvHistoryProvider> {
    let metadata =
        JsonMetadataProvider::from_reader(FACILITIES_JSON.as_bytes()).expect("metadata parses");
    let history =
        CsvHistoryProvider::from_reader(HISTORY_CSV.as_bytes()).expect("history parses");
    AdmissionScoreService::new(
        Arc::new(metadata),
        Arc::new(history),
        ScoringConfig::default(),
    )
}

fn score_request(facility: &str) -> ScoreRequest {
    ScoreRequest {
        facility_id: FacilityId(facility.to_string()),
        child_id: ChildId("child-042".to_string()),
        target_class: AgeClass::Age1,
        priority: PriorityKind::DualIncome,
        additional_priorities: BTreeSet::new(),
    }
}

fn february() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 15).expect("valid date")
}

#[test]
fn rich_facility_data_produces_an_a_grade() {
    let service = build_service();

    let result = service
        .score_as_of(&score_request("fac-001"), february())
        .expect("scoring succeeds");

    assert_eq!(result.facility_name, "Sakura Nursery");
    assert_eq!(result.grade, Grade::A);
    assert!(result.probability >= 80.0);
    assert!(result.confidence >= 0.5);
    assert_eq!(result.estimated_months, 2);
    assert_eq!(result.factors.len(), 5);
    // The age2 row must not leak into an age1 request.
    assert_eq!(result.similar_cases.len(), 8);
}

#[test]
fn facility_without_data_still_gets_an_answer() {
    let service = build_service();

    let result = service
        .score_as_of(&score_request("fac-002"), february())
        .expect("partial data degrades, never fails");

    assert_eq!(result.probability, 50.0);
    assert_eq!(result.grade, Grade::D);
    assert!(result.similar_cases.is_empty());
    assert_eq!(result.recommendations.len(), 1);
}

#[test]
fn unknown_facility_is_reported_as_unavailable_context() {
    let service = build_service();

    match service.score_as_of(&score_request("fac-404"), february()) {
        Err(AdmissionScoreError::DataUnavailable(_)) => {}
        other => panic!("expected data unavailable, got {other:?}"),
    }
}

#[test]
fn malformed_priority_sets_are_rejected_before_any_lookup() {
    let service = build_service();
    let mut request = score_request("fac-001");
    request.additional_priorities.insert(PriorityKind::DualIncome);

    match service.score_as_of(&request, february()) {
        Err(AdmissionScoreError::InvalidRequest(InvalidRequest::DuplicatePrimary(_))) => {}
        other => panic!("expected invalid request, got {other:?}"),
    }
}

#[tokio::test]
async fn score_route_serves_the_assembled_result() {
    let router = admission_router(Arc::new(build_service()));

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/admission/score")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&score_request("fac-001")).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");

    assert_eq!(payload["facility_name"], "Sakura Nursery");
    assert_eq!(payload["factors"].as_object().map(|map| map.len()), Some(5));
    assert!(payload["recommendations"].as_array().is_some_and(|list| {
        !list.is_empty() && list.len() <= 4
    }));
}
