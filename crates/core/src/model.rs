//! Wire model for healthcare resource records.
//!
//! This module provides the wire representations of resource processing
//! metadata as produced by the ingestion pipeline. Field names follow the
//! upstream camelCase JSON (`resourceType`, `patientId`, `humanReadableStr`)
//! and enumerations keep their upstream wire names
//! (`PROCESSING_STATE_COMPLETED`, `FHIR_VERSION_R4`).
//!
//! Processing state is **purely descriptive** here: records arrive with a
//! pre-computed state and this crate owns no transition logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::DashboardError;

/// Lifecycle stage of a resource's ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProcessingState {
    #[serde(rename = "PROCESSING_STATE_NOT_STARTED")]
    NotStarted,
    #[serde(rename = "PROCESSING_STATE_PROCESSING")]
    Processing,
    #[serde(rename = "PROCESSING_STATE_COMPLETED")]
    Completed,
    #[serde(rename = "PROCESSING_STATE_FAILED")]
    Failed,
}

impl ProcessingState {
    /// The full upstream wire name, e.g. `PROCESSING_STATE_COMPLETED`.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::NotStarted => "PROCESSING_STATE_NOT_STARTED",
            Self::Processing => "PROCESSING_STATE_PROCESSING",
            Self::Completed => "PROCESSING_STATE_COMPLETED",
            Self::Failed => "PROCESSING_STATE_FAILED",
        }
    }
}

impl std::fmt::Display for ProcessingState {
    /// Renders the badge text with the wire prefix stripped (`COMPLETED`, ...).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::NotStarted => "NOT_STARTED",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        };
        write!(f, "{text}")
    }
}

impl std::str::FromStr for ProcessingState {
    type Err = DashboardError;

    /// Accepts either the wire name or the badge text, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PROCESSING_STATE_NOT_STARTED" | "NOT_STARTED" => Ok(Self::NotStarted),
            "PROCESSING_STATE_PROCESSING" | "PROCESSING" => Ok(Self::Processing),
            "PROCESSING_STATE_COMPLETED" | "COMPLETED" => Ok(Self::Completed),
            "PROCESSING_STATE_FAILED" | "FAILED" => Ok(Self::Failed),
            other => Err(DashboardError::InvalidInput(format!(
                "unrecognised processing state: {other}"
            ))),
        }
    }
}

/// FHIR standard revision attached to a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FhirVersion {
    #[serde(rename = "FHIR_VERSION_R4")]
    R4,
    #[serde(rename = "FHIR_VERSION_R4B")]
    R4B,
}

impl FhirVersion {
    /// The full upstream wire name, e.g. `FHIR_VERSION_R4`.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::R4 => "FHIR_VERSION_R4",
            Self::R4B => "FHIR_VERSION_R4B",
        }
    }
}

impl std::fmt::Display for FhirVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::R4 => "R4",
            Self::R4B => "R4B",
        };
        write!(f, "{text}")
    }
}

impl std::str::FromStr for FhirVersion {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FHIR_VERSION_R4" | "R4" => Ok(Self::R4),
            "FHIR_VERSION_R4B" | "R4B" => Ok(Self::R4B),
            other => Err(DashboardError::InvalidInput(format!(
                "unrecognised FHIR version: {other}"
            ))),
        }
    }
}

/// Identity of a resource record.
///
/// `key` is unique per visible row and is used as the map key for row
/// expansion and per-row analysis caches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIdentifier {
    pub key: String,
    pub uid: String,
    pub patient_id: String,
}

/// Processing metadata attached to a resource by the ingestion pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetadata {
    pub state: ProcessingState,
    pub created_time: DateTime<Utc>,
    pub fetch_time: DateTime<Utc>,
    /// Absent until the resource has been processed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_time: Option<DateTime<Utc>>,
    pub identifier: ResourceIdentifier,
    pub resource_type: String,
    pub version: FhirVersion,
}

/// A healthcare resource: processing metadata plus a free-text summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub metadata: ResourceMetadata,
    pub human_readable_str: String,
}

/// The collection element type: wraps one [`Resource`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceWrapper {
    pub resource: Resource,
}

impl ResourceWrapper {
    /// The row identity used by expansion and analysis maps.
    pub fn key(&self) -> &str {
        &self.resource.metadata.identifier.key
    }
}
