/// Errors that can occur while producing an analysis.
///
/// The REST layer maps these onto the caller-visible taxonomy: validation
/// failures are the caller's to fix (400), a missing credential is the
/// operator's (500), upstream and transport failures surface as generic
/// 500s whose details are logged but never echoed to the client.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Missing required fields: resourceType and patientId are required")]
    MissingRequiredFields,

    #[error("OpenAI API key not configured")]
    MissingCredential,

    /// The completion API answered with a non-success status.
    #[error("Failed to generate AI analysis")]
    UpstreamStatus,

    /// Transport-level failure talking to the completion API.
    #[error("analysis request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The analyze request body could not be parsed.
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}
