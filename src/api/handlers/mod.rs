use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::models::*;
use crate::query::{QueryEngine, QueryError};

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Map a query error to a client-facing status.
///
/// Both variants describe the request or the loaded data, so the message is
/// safe to return as-is.
fn query_error(e: QueryError) -> (StatusCode, String) {
    let status = match e {
        QueryError::EmptyDataset => StatusCode::NOT_FOUND,
        QueryError::InvalidDate(_) => StatusCode::BAD_REQUEST,
    };
    tracing::warn!("Query rejected: {}", e);
    (status, e.to_string())
}

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn engine(state: &AppState) -> QueryEngine {
    QueryEngine::new(state.dataset.snapshot())
}

// ============================================================
// Response Types
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub records: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyMissions {
    pub company: String,
    pub missions: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanySuccessRate {
    pub company: String,
    pub success_rate: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct YearAverage {
    pub start_year: i32,
    pub end_year: i32,
    pub average: f64,
}

/// First and last launch, by year and by date. Both are `null` for an empty dataset.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetSpan {
    pub years: Option<YearSpan>,
    pub dates: Option<DateSpan>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub records: usize,
    pub companies: usize,
}

// ============================================================
// Health
// ============================================================

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        records: state.dataset.snapshot().len(),
    })
}

// ============================================================
// Missions
// ============================================================

/// Query parameters for paging through the raw mission table.
#[derive(Debug, Deserialize)]
pub struct ListMissionsQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

pub async fn list_missions(
    State(state): State<AppState>,
    Query(query): Query<ListMissionsQuery>,
) -> Json<Vec<MissionRecord>> {
    let dataset = state.dataset.snapshot();
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(usize::MAX);

    let records = dataset
        .records()
        .iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();
    Json(records)
}

/// Query parameters for the date range filter.
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start: String,
    pub end: String,
    /// Reject unparseable bounds with 400 instead of returning an empty list.
    #[serde(default)]
    pub strict: bool,
}

pub async fn missions_by_date_range(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<Vec<String>> {
    let engine = engine(&state);
    if query.strict {
        engine
            .try_missions_by_date_range(&query.start, &query.end)
            .map(Json)
            .map_err(query_error)
    } else {
        Ok(Json(engine.missions_by_date_range(&query.start, &query.end)))
    }
}

pub async fn mission_status_count(State(state): State<AppState>) -> Json<StatusCounts> {
    Json(engine(&state).mission_status_count())
}

pub async fn missions_per_year(State(state): State<AppState>) -> Json<Vec<YearCount>> {
    Json(engine(&state).missions_per_year())
}

pub async fn missions_by_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Json<YearCount> {
    Json(YearCount {
        year,
        missions: engine(&state).missions_by_year(year),
    })
}

/// Query parameters for the per-year average. Both bounds are inclusive.
#[derive(Debug, Deserialize)]
pub struct AverageQuery {
    pub start: i32,
    pub end: i32,
}

pub async fn average_missions_per_year(
    State(state): State<AppState>,
    Query(query): Query<AverageQuery>,
) -> Json<YearAverage> {
    Json(YearAverage {
        start_year: query.start,
        end_year: query.end,
        average: engine(&state).average_missions_per_year(query.start, query.end),
    })
}

pub async fn dataset_span(State(state): State<AppState>) -> Json<DatasetSpan> {
    let engine = engine(&state);
    Json(DatasetSpan {
        years: engine.year_span(),
        dates: engine.date_span(),
    })
}

// ============================================================
// Companies
// ============================================================

pub async fn list_companies(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(engine(&state).companies())
}

#[derive(Debug, Deserialize)]
pub struct TopCompaniesQuery {
    pub n: Option<usize>,
}

pub async fn top_companies(
    State(state): State<AppState>,
    Query(query): Query<TopCompaniesQuery>,
) -> Json<Vec<CompanyCount>> {
    let n = query.n.unwrap_or(state.default_top_n);
    Json(engine(&state).top_companies_by_mission_count(n))
}

pub async fn company_summary(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> Json<CompanySummary> {
    Json(engine(&state).company_summary(&company))
}

pub async fn mission_count_by_company(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> Json<CompanyMissions> {
    let missions = engine(&state).mission_count_by_company(&company);
    Json(CompanyMissions { company, missions })
}

pub async fn success_rate(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> Json<CompanySuccessRate> {
    let success_rate = engine(&state).success_rate(&company);
    Json(CompanySuccessRate {
        company,
        success_rate,
    })
}

// ============================================================
// Rockets
// ============================================================

pub async fn most_used_rocket(State(state): State<AppState>) -> ApiResult<RocketUsage> {
    engine(&state)
        .most_used_rocket_usage()
        .map(Json)
        .map_err(query_error)
}

pub async fn rocket_usage(
    State(state): State<AppState>,
    Path(rocket): Path<String>,
) -> Json<RocketUsage> {
    let missions = engine(&state).rocket_usage(&rocket);
    Json(RocketUsage { rocket, missions })
}

// ============================================================
// Dataset
// ============================================================

/// Re-read the dataset source and publish it.
///
/// The file is parsed on the blocking pool. Requests already in flight keep
/// the snapshot they started with.
pub async fn reload_dataset(State(state): State<AppState>) -> ApiResult<ReloadResponse> {
    let handle = state.dataset.clone();
    let dataset = tokio::task::spawn_blocking(move || handle.reload())
        .await
        .map_err(internal_error)?
        .map_err(internal_error)?;

    tracing::info!("Reloaded mission dataset ({} records)", dataset.len());
    Ok(Json(ReloadResponse {
        records: dataset.len(),
        companies: dataset.company_frequency().len(),
    }))
}
