use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{AgeClass, CaseOutcome, FacilityId, HistoricalCase, PriorityKind};
use super::providers::{FacilityHistoryProvider, ProviderError};

/// Historical-case provider backed by a municipal admission-records CSV export.
///
/// Expected header: `facility_id,target_class,priority,waiting_months,result,year`.
pub struct CsvHistoryProvider {
    records: Vec<HistoryRecord>,
}

#[derive(Debug, Clone)]
struct HistoryRecord {
    facility_id: FacilityId,
    target_class: AgeClass,
    case: HistoricalCase,
}

impl CsvHistoryProvider {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HistoryImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, HistoryImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.deserialize::<HistoryRow>() {
            let row = row?;
            records.push(HistoryRecord {
                facility_id: FacilityId(row.facility_id),
                target_class: row.target_class,
                case: HistoricalCase {
                    priority: row.priority,
                    waiting_months: row.waiting_months,
                    outcome: row.result,
                    year: row.year,
                },
            });
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FacilityHistoryProvider for CsvHistoryProvider {
    fn get_cases(
        &self,
        facility_id: &FacilityId,
        target_class: AgeClass,
    ) -> Result<Vec<HistoricalCase>, ProviderError> {
        let cases = self
            .records
            .iter()
            .filter(|record| {
                record.facility_id == *facility_id && record.target_class == target_class
            })
            .map(|record| record.case.clone())
            .collect();
        Ok(cases)
    }
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    facility_id: String,
    target_class: AgeClass,
    priority: PriorityKind,
    waiting_months: u32,
    result: CaseOutcome,
    year: i32,
}

/// Error importing the admission-records export.
#[derive(Debug, thiserror::Error)]
pub enum HistoryImportError {
    #[error("unable to read admission records: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed admission records: {0}")]
    Csv(#[from] csv::Error),
}
