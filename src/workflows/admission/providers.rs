use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::domain::{AgeClass, FacilityId, FacilityMetadata, HistoricalCase};

/// Lookup failure from a collaborator. Providers enforce their own deadlines and
/// surface expiry as `Timeout`, which callers may retry with backoff.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("facility not found")]
    NotFound,
    #[error("lookup timed out")]
    Timeout,
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Facility context collaborator: turnover, competition, seasonal window, and queue
/// statistics for one facility.
pub trait FacilityMetadataProvider: Send + Sync {
    fn get(&self, facility_id: &FacilityId) -> Result<FacilityMetadata, ProviderError>;
}

/// Historical admission outcomes for a facility (or its comparable group), already
/// scoped to the target class.
pub trait FacilityHistoryProvider: Send + Sync {
    fn get_cases(
        &self,
        facility_id: &FacilityId,
        target_class: AgeClass,
    ) -> Result<Vec<HistoricalCase>, ProviderError>;
}

/// File-backed metadata provider over a JSON facility map, for the CLI and demo
/// server. Keys are facility ids.
pub struct JsonMetadataProvider {
    facilities: BTreeMap<FacilityId, FacilityMetadata>,
}

impl JsonMetadataProvider {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MetadataImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MetadataImportError> {
        let entries: Vec<FacilityMetadata> = serde_json::from_reader(reader)?;
        let facilities = entries
            .into_iter()
            .map(|metadata| (metadata.facility_id.clone(), metadata))
            .collect();
        Ok(Self { facilities })
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

impl FacilityMetadataProvider for JsonMetadataProvider {
    fn get(&self, facility_id: &FacilityId) -> Result<FacilityMetadata, ProviderError> {
        self.facilities
            .get(facility_id)
            .cloned()
            .ok_or(ProviderError::NotFound)
    }
}

/// Error importing the facility metadata file.
#[derive(Debug, thiserror::Error)]
pub enum MetadataImportError {
    #[error("unable to read facility metadata: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed facility metadata: {0}")]
    Json(#[from] serde_json::Error),
}

/// A history provider that always reports an empty past, for facilities with no
/// records on file yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyHistoryProvider;

impl FacilityHistoryProvider for EmptyHistoryProvider {
    fn get_cases(
        &self,
        _facility_id: &FacilityId,
        _target_class: AgeClass,
    ) -> Result<Vec<HistoricalCase>, ProviderError> {
        Ok(Vec::new())
    }
}
