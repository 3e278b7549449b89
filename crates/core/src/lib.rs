//! # EHR Dashboard Core
//!
//! Core business logic for the EHR resource dashboard.
//!
//! This crate contains pure data operations with no API concerns:
//! - The resource wire model (processing metadata, identifiers, summaries)
//! - The table controller: a reducer-style state machine for sorting,
//!   filtering, pagination, row expansion and per-row analysis tracking
//! - CSV export of the filtered row set
//! - Summary statistics by processing state
//!
//! **No API concerns**: HTTP servers, OpenAPI documentation, or outbound
//! calls to the completion API belong in `api-rest` and `ehrdash-analysis`.

pub mod error;
pub mod export;
pub mod model;
pub mod sample;
pub mod stats;
pub mod table;

pub use error::{DashboardError, DashboardResult};
pub use export::{csv_export, EXPORT_FILE_NAME};
pub use model::{
    FhirVersion, ProcessingState, Resource, ResourceIdentifier, ResourceMetadata, ResourceWrapper,
};
pub use sample::{load_resources, sample_resources};
pub use stats::ResourceStats;
pub use table::{
    AnalysisState, Column, PageSize, SortDirection, TableAction, TableState, ANALYSIS_FAILED_FALLBACK,
};
