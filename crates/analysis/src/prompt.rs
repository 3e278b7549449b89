//! Prompt construction for resource analysis.
//!
//! Kept as a pure function over the request so the wording can be unit tested
//! without touching the network.

use crate::AnalysisRequest;

/// Fixed system instruction sent with every analysis request.
pub const SYSTEM_PROMPT: &str = "You are a healthcare data analyst specializing in FHIR resources. Provide concise, professional analysis of healthcare resources.";

/// Builds the user prompt embedding the five request fields.
///
/// An absent (or empty) FHIR version renders as `Not specified`, an absent
/// summary as `Not provided`.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    let field = |value: &Option<String>| -> String {
        value.clone().unwrap_or_default()
    };
    let fhir_version = request
        .fhir_version
        .as_deref()
        .filter(|value| !value.is_empty())
        .unwrap_or("Not specified");
    let summary = request
        .summary
        .as_deref()
        .filter(|value| !value.is_empty())
        .unwrap_or("Not provided");

    format!(
        "Analyze this healthcare resource and provide a brief, formal analysis in 2-3 sentences:\n\
         \n\
         Resource Type: {resource_type}\n\
         Patient ID: {patient_id}\n\
         Processing Status: {status}\n\
         FHIR Version: {fhir_version}\n\
         Resource Summary: {summary}\n\
         \n\
         Please provide a professional analysis that describes the resource's clinical significance, processing status, and any relevant insights for healthcare professionals.",
        resource_type = field(&request.resource_type),
        patient_id = field(&request.patient_id),
        status = request.status,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            resource_type: Some("Patient".to_string()),
            summary: Some("Patient John Doe, age 35".to_string()),
            patient_id: Some("P001".to_string()),
            status: "PROCESSING_STATE_COMPLETED".to_string(),
            fhir_version: Some("FHIR_VERSION_R4".to_string()),
        }
    }

    #[test]
    fn test_prompt_embeds_all_five_fields() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("Resource Type: Patient\n"));
        assert!(prompt.contains("Patient ID: P001\n"));
        assert!(prompt.contains("Processing Status: PROCESSING_STATE_COMPLETED\n"));
        assert!(prompt.contains("FHIR Version: FHIR_VERSION_R4\n"));
        assert!(prompt.contains("Resource Summary: Patient John Doe, age 35\n"));
    }

    #[test]
    fn test_missing_optionals_render_placeholders() {
        let prompt = build_prompt(&AnalysisRequest {
            summary: None,
            fhir_version: None,
            ..request()
        });
        assert!(prompt.contains("FHIR Version: Not specified\n"));
        assert!(prompt.contains("Resource Summary: Not provided"));
    }

    #[test]
    fn test_empty_optionals_render_placeholders() {
        let prompt = build_prompt(&AnalysisRequest {
            summary: Some(String::new()),
            fhir_version: Some(String::new()),
            ..request()
        });
        assert!(prompt.contains("FHIR Version: Not specified\n"));
        assert!(prompt.contains("Resource Summary: Not provided"));
    }
}
