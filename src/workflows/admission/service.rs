use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::warn;

use super::domain::{InvalidRequest, ScoreRequest};
use super::providers::{FacilityHistoryProvider, FacilityMetadataProvider, ProviderError};
use super::scoring::{ScoreResult, ScoringConfig, ScoringContext, ScoringEngine};

/// Facade composing the metadata and history collaborators with the scoring engine.
///
/// Partial data degrades the answer's confidence; only an unresolvable facility or a
/// malformed request fails the call, and never with a partially assembled result.
pub struct AdmissionScoreService<M, H> {
    metadata: Arc<M>,
    history: Arc<H>,
    engine: Arc<ScoringEngine>,
}

impl<M, H> AdmissionScoreService<M, H>
where
    M: FacilityMetadataProvider + 'static,
    H: FacilityHistoryProvider + 'static,
{
    pub fn new(metadata: Arc<M>, history: Arc<H>, config: ScoringConfig) -> Self {
        Self {
            metadata,
            history,
            engine: Arc::new(ScoringEngine::new(config)),
        }
    }

    /// Score a request as of today.
    pub fn score(&self, request: &ScoreRequest) -> Result<ScoreResult, AdmissionScoreError> {
        self.score_as_of(request, Local::now().date_naive())
    }

    /// Score a request against a fixed evaluation date.
    ///
    /// The result is a pure function of the request, the providers' data, and
    /// `as_of`; repeated calls with unchanged inputs are bit-identical.
    pub fn score_as_of(
        &self,
        request: &ScoreRequest,
        as_of: NaiveDate,
    ) -> Result<ScoreResult, AdmissionScoreError> {
        request.validate()?;

        let facility = self
            .metadata
            .get(&request.facility_id)
            .map_err(AdmissionScoreError::DataUnavailable)?;

        let cases = match self
            .history
            .get_cases(&request.facility_id, request.target_class)
        {
            Ok(cases) => cases,
            Err(error) => {
                warn!(
                    facility = %request.facility_id.0,
                    %error,
                    "admission history unavailable, scoring without similar cases"
                );
                Vec::new()
            }
        };

        let context = ScoringContext {
            facility,
            cases,
            as_of,
        };
        Ok(self.engine.score(request, &context))
    }
}

/// Error raised by the scoring facade. Exactly two caller-visible kinds: malformed
/// input (never retried) and unresolved facility context (often transient).
#[derive(Debug, thiserror::Error)]
pub enum AdmissionScoreError {
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequest),
    #[error("facility data unavailable: {0}")]
    DataUnavailable(#[source] ProviderError),
}
