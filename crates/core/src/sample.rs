//! Demo fixture and file loading for the resource collection.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};

use crate::model::{
    FhirVersion, ProcessingState, Resource, ResourceIdentifier, ResourceMetadata, ResourceWrapper,
};
use crate::{DashboardError, DashboardResult};

fn ts(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, hour, min, 0).unwrap()
}

#[allow(clippy::too_many_arguments)]
fn record(
    state: ProcessingState,
    created: DateTime<Utc>,
    fetched: DateTime<Utc>,
    processed: Option<DateTime<Utc>>,
    key: &str,
    uid: &str,
    patient_id: &str,
    resource_type: &str,
    version: FhirVersion,
    summary: &str,
) -> ResourceWrapper {
    ResourceWrapper {
        resource: Resource {
            metadata: ResourceMetadata {
                state,
                created_time: created,
                fetch_time: fetched,
                processed_time: processed,
                identifier: ResourceIdentifier {
                    key: key.to_string(),
                    uid: uid.to_string(),
                    patient_id: patient_id.to_string(),
                },
                resource_type: resource_type.to_string(),
                version,
            },
            human_readable_str: summary.to_string(),
        },
    }
}

/// The six demonstration records shipped with the dashboard.
pub fn sample_resources() -> Vec<ResourceWrapper> {
    vec![
        record(
            ProcessingState::Completed,
            ts(10, 30),
            ts(10, 35),
            Some(ts(10, 40)),
            "patient-001",
            "urn:uuid:12345678-1234-1234-1234-123456789abc",
            "P001",
            "Patient",
            FhirVersion::R4,
            "Patient John Doe, age 35, admitted for chest pain",
        ),
        record(
            ProcessingState::Processing,
            ts(11, 0),
            ts(11, 5),
            None,
            "observation-001",
            "urn:uuid:87654321-4321-4321-4321-cba987654321",
            "P001",
            "Observation",
            FhirVersion::R4,
            "Blood pressure reading: 140/90 mmHg",
        ),
        record(
            ProcessingState::Failed,
            ts(12, 0),
            ts(12, 5),
            None,
            "medication-001",
            "urn:uuid:11111111-2222-3333-4444-555555555555",
            "P002",
            "MedicationRequest",
            FhirVersion::R4B,
            "Prescription for Aspirin 100mg daily",
        ),
        record(
            ProcessingState::NotStarted,
            ts(13, 0),
            ts(13, 5),
            None,
            "procedure-001",
            "urn:uuid:aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee",
            "P003",
            "Procedure",
            FhirVersion::R4,
            "Cardiac catheterization procedure scheduled",
        ),
        record(
            ProcessingState::Completed,
            ts(14, 0),
            ts(14, 5),
            Some(ts(14, 10)),
            "condition-001",
            "urn:uuid:bbbbbbbb-cccc-dddd-eeee-ffffffffffff",
            "P001",
            "Condition",
            FhirVersion::R4,
            "Diagnosis: Acute coronary syndrome",
        ),
        record(
            ProcessingState::Completed,
            ts(15, 0),
            ts(15, 5),
            Some(ts(15, 10)),
            "encounter-001",
            "urn:uuid:cccccccc-dddd-eeee-ffff-000000000000",
            "P001",
            "Encounter",
            FhirVersion::R4,
            "Emergency department visit for chest pain",
        ),
    ]
}

/// Loads a resource collection from a JSON file.
///
/// Expects an array of wrapped resources in the upstream camelCase wire
/// format, as produced by the ingestion pipeline.
pub fn load_resources(path: &Path) -> DashboardResult<Vec<ResourceWrapper>> {
    let contents = std::fs::read_to_string(path).map_err(DashboardError::FileRead)?;
    serde_json::from_str(&contents).map_err(DashboardError::Deserialization)
}
