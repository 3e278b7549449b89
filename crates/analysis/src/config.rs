//! Analysis runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! completion client. Request handlers never read process-wide environment
//! variables; a missing credential is carried as `None` and surfaces as a
//! per-request configuration error rather than a startup crash.

/// Default base URL of the completion API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable holding the completion API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the completion API base URL.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Completion parameters fixed by the analysis contract.
pub const COMPLETION_MODEL: &str = "gpt-3.5-turbo";
pub const MAX_COMPLETION_TOKENS: u32 = 200;
pub const COMPLETION_TEMPERATURE: f32 = 0.3;

/// Analysis configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    api_key: Option<String>,
    base_url: String,
}

impl AnalysisConfig {
    /// Create a new `AnalysisConfig`. A trailing slash on `base_url` is
    /// tolerated and stripped.
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url,
        }
    }

    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok();
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(api_key, base_url)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new(None, DEFAULT_BASE_URL)
    }
}
