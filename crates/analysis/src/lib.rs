//! # EHR Dashboard Analysis
//!
//! Outbound analysis support for the dashboard: builds a fixed prompt from a
//! resource description and forwards it to an external chat-completion API
//! using a server-held credential.
//!
//! This crate owns:
//! - The analyze request wire type and its validation
//! - Prompt construction as a pure function, testable without the network
//! - The completion client (reqwest) and the [`CompletionBackend`] seam
//! - The analysis error taxonomy
//!
//! Every invocation is independent; no state is retained between calls.

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
pub mod request;

pub use client::{CompletionBackend, CompletionClient, ANALYSIS_UNAVAILABLE};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use prompt::{build_prompt, SYSTEM_PROMPT};
pub use request::AnalysisRequest;
