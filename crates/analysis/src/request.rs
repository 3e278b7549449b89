use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AnalysisError;

/// Resource description submitted to `POST /api/analyze`.
///
/// `resource_type` and `patient_id` are required by validation rather than by
/// deserialization so that an absent field yields the caller-fixable
/// validation error instead of a body-parse failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fhir_version: Option<String>,
}

impl AnalysisRequest {
    /// Checks that both required fields are present and non-empty.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let present = |field: &Option<String>| {
            field.as_deref().is_some_and(|value| !value.trim().is_empty())
        };
        if !present(&self.resource_type) || !present(&self.patient_id) {
            return Err(AnalysisError::MissingRequiredFields);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_resource_type_and_patient_id() {
        let request = AnalysisRequest {
            resource_type: Some("Patient".to_string()),
            patient_id: Some("P001".to_string()),
            ..AnalysisRequest::default()
        };
        assert!(request.validate().is_ok());

        let missing_type = AnalysisRequest {
            patient_id: Some("P001".to_string()),
            ..AnalysisRequest::default()
        };
        assert!(matches!(
            missing_type.validate(),
            Err(AnalysisError::MissingRequiredFields)
        ));

        let blank_patient = AnalysisRequest {
            resource_type: Some("Patient".to_string()),
            patient_id: Some("   ".to_string()),
            ..AnalysisRequest::default()
        };
        assert!(blank_patient.validate().is_err());
    }

    #[test]
    fn test_deserializes_camel_case_body() {
        let request: AnalysisRequest = serde_json::from_str(
            r#"{
                "resourceType": "Patient",
                "patientId": "P001",
                "status": "PROCESSING_STATE_COMPLETED",
                "fhirVersion": "FHIR_VERSION_R4",
                "summary": "Patient John Doe..."
            }"#,
        )
        .unwrap();
        assert_eq!(request.resource_type.as_deref(), Some("Patient"));
        assert_eq!(request.status, "PROCESSING_STATE_COMPLETED");
        assert_eq!(request.fhir_version.as_deref(), Some("FHIR_VERSION_R4"));
    }
}
