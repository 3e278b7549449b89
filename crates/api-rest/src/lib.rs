//! # API REST
//!
//! REST API for the EHR resource dashboard.
//!
//! Handles:
//! - The analysis proxy (`POST /api/analyze`)
//! - Resource listing with summary statistics (`GET /api/resources`)
//! - CSV export of the filtered collection (`GET /api/resources/export`)
//! - OpenAPI/Swagger documentation
//!
//! Uses `ehrdash-core` for the table controller and `ehrdash-analysis` for
//! the outbound completion call.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use ehrdash_analysis::{AnalysisError, AnalysisRequest, CompletionBackend};
use ehrdash_core::{
    csv_export, Column, DashboardError, ResourceStats, ResourceWrapper, SortDirection,
    TableAction, TableState, EXPORT_FILE_NAME,
};

/// Application state shared across REST API handlers.
///
/// Holds the loaded resource collection and the completion backend used by
/// the analysis proxy.
#[derive(Clone)]
pub struct AppState {
    pub resources: Arc<Vec<ResourceWrapper>>,
    pub backend: Arc<dyn CompletionBackend>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct AnalyzeRes {
    pub analysis: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(Serialize, ToSchema)]
pub struct ListResourcesRes {
    pub resources: Vec<ResourceWrapper>,
    pub stats: ResourceStats,
}

/// Optional filter/sort parameters for the CSV export endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    /// Free-text filter matched against every column.
    pub q: Option<String>,
    /// Processing state equality filter (wire or badge name).
    pub status: Option<String>,
    /// Resource type equality filter.
    pub resource_type: Option<String>,
    /// FHIR version equality filter (wire or short name).
    pub fhir_version: Option<String>,
    /// Column id to sort by (`key`, `patientId`, `resourceType`, `state`,
    /// `version`, `createdTime`, `summary`).
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`.
    pub sort_dir: Option<String>,
}

/// Maps analysis failures onto the caller-visible status + message pairs.
///
/// Upstream and transport details are logged here, never echoed to the
/// client.
pub struct ApiError(AnalysisError);

impl From<AnalysisError> for ApiError {
    fn from(error: AnalysisError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AnalysisError::MissingRequiredFields => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            AnalysisError::MissingCredential | AnalysisError::UpstreamStatus => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
            }
            AnalysisError::Http(error) => {
                tracing::error!("Analysis error: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error during analysis".to_string(),
                )
            }
            AnalysisError::InvalidBody(error) => {
                tracing::error!("Analysis error: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error during analysis".to_string(),
                )
            }
        };
        (status, Json(ErrorRes { error: message })).into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_resources, export_resources, analyze),
    components(schemas(
        HealthRes,
        AnalyzeRes,
        ErrorRes,
        ListResourcesRes,
        AnalysisRequest,
        ResourceStats,
        ResourceWrapper,
        ehrdash_core::Resource,
        ehrdash_core::ResourceMetadata,
        ehrdash_core::ResourceIdentifier,
        ehrdash_core::ProcessingState,
        ehrdash_core::FhirVersion,
    ))
)]
struct ApiDoc;

/// Builds the dashboard REST router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/resources", get(list_resources))
        .route("/api/resources/export", get(export_resources))
        .route("/api/analyze", post(analyze))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "EHR dashboard is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/resources",
    responses(
        (status = 200, description = "The loaded resource collection with summary counts", body = ListResourcesRes)
    )
)]
async fn list_resources(State(state): State<AppState>) -> Json<ListResourcesRes> {
    Json(ListResourcesRes {
        resources: (*state.resources).clone(),
        stats: ResourceStats::collect(&state.resources),
    })
}

fn bad_request(error: DashboardError) -> (StatusCode, Json<ErrorRes>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorRes {
            error: error.to_string(),
        }),
    )
}

/// Builds a table state from export query parameters.
fn table_state_from_query(query: &ExportQuery) -> Result<TableState, DashboardError> {
    let mut table = TableState::new();
    if let Some(q) = &query.q {
        table = table.apply(TableAction::SetSearch(q.clone()));
    }
    if let Some(status) = &query.status {
        table = table.apply(TableAction::SetStateFilter(Some(status.parse()?)));
    }
    if let Some(resource_type) = &query.resource_type {
        table = table.apply(TableAction::SetResourceTypeFilter(Some(
            resource_type.clone(),
        )));
    }
    if let Some(version) = &query.fhir_version {
        table = table.apply(TableAction::SetVersionFilter(Some(version.parse()?)));
    }
    if let Some(sort_by) = &query.sort_by {
        let column: Column = sort_by.parse()?;
        let direction = match &query.sort_dir {
            Some(dir) => dir.parse()?,
            None => SortDirection::Ascending,
        };
        table = table.apply(TableAction::SetSort(Some((column, direction))));
    }
    Ok(table)
}

#[utoipa::path(
    get,
    path = "/api/resources/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "CSV snapshot of the filtered collection", body = String, content_type = "text/csv"),
        (status = 400, description = "Unrecognised filter or sort parameter", body = ErrorRes)
    )
)]
async fn export_resources(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, (StatusCode, Json<ErrorRes>)> {
    let table = table_state_from_query(&query).map_err(bad_request)?;
    let rows = table.filtered_rows(&state.resources);
    let csv = csv_export(&rows).map_err(|error| {
        tracing::error!("CSV export error: {error}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorRes {
                error: "Failed to export resources".to_string(),
            }),
        )
    })?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
        ),
    ];
    Ok((headers, csv).into_response())
}

#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Generated analysis", body = AnalyzeRes),
        (status = 400, description = "Missing required fields", body = ErrorRes),
        (status = 500, description = "Missing credential, upstream failure, or internal error", body = ErrorRes)
    )
)]
async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalyzeRes>, ApiError> {
    let request: AnalysisRequest =
        serde_json::from_slice(&body).map_err(AnalysisError::from)?;
    request.validate()?;
    let analysis = state.backend.complete(&request).await?;
    Ok(Json(AnalyzeRes { analysis }))
}
