mod handlers;

pub use handlers::{
    CompanyMissions, CompanySuccessRate, DatasetSpan, HealthResponse, ReloadResponse, YearAverage,
};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::dataset::DatasetHandle;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub dataset: DatasetHandle,
    pub default_top_n: usize,
}

pub fn create_router(dataset: DatasetHandle) -> Router {
    create_router_with_config(dataset, &AppConfig::default())
}

pub fn create_router_with_config(dataset: DatasetHandle, config: &AppConfig) -> Router {
    let state = AppState {
        dataset,
        default_top_n: config.default_top_n,
    };

    let api = Router::new()
        // Missions
        .route("/missions", get(handlers::list_missions))
        .route("/missions/range", get(handlers::missions_by_date_range))
        .route("/missions/status", get(handlers::mission_status_count))
        .route("/missions/span", get(handlers::dataset_span))
        .route("/missions/years", get(handlers::missions_per_year))
        .route(
            "/missions/years/average",
            get(handlers::average_missions_per_year),
        )
        .route("/missions/years/{year}", get(handlers::missions_by_year))
        // Companies
        .route("/companies", get(handlers::list_companies))
        .route("/companies/top", get(handlers::top_companies))
        .route("/companies/{name}", get(handlers::company_summary))
        .route("/companies/{name}/count", get(handlers::mission_count_by_company))
        .route("/companies/{name}/success-rate", get(handlers::success_rate))
        // Rockets
        .route("/rockets/most-used", get(handlers::most_used_rocket))
        .route("/rockets/{name}", get(handlers::rocket_usage))
        // Dataset
        .route("/dataset/reload", post(handlers::reload_dataset))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
