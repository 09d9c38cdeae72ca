// src/web/handlers/search.rs
//! Job search endpoint handler.
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::database::DatabaseConfig;
use crate::search::{refined_search, RawFilters, SearchCriteria, SearchError};
use crate::web::types::{DataResponse, SearchResultsData, ServerConfig, StandardErrorResponse};

pub async fn search_jobs_handler(
    filters: RawFilters,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<SearchResultsData>>, Json<StandardErrorResponse>> {
    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database pool unavailable: {}", e);
            return Err(Json(storage_unavailable()));
        }
    };

    let criteria = match SearchCriteria::parse(&filters) {
        Ok(criteria) => criteria,
        Err(e) => {
            info!("Rejecting search request: {}", e);
            return Err(Json(StandardErrorResponse::new(
                e.to_string(),
                "INVALID_FILTER_VALUE".to_string(),
                vec!["Experience filters must be whole numbers".to_string()],
            )));
        }
    };

    match refined_search(pool, &config.search, &criteria).await {
        Ok(outcome) => {
            let data = SearchResultsData::from(outcome);
            info!("Search returned {} postings", data.total);
            Ok(Json(DataResponse::success(
                format!("{} jobs found", data.total),
                data,
            )))
        }
        Err(SearchError::InvalidFilterValue { key, value }) => Err(Json(
            StandardErrorResponse::new(
                format!("invalid value for {key}: '{value}' is not an integer"),
                "INVALID_FILTER_VALUE".to_string(),
                vec!["Experience filters must be whole numbers".to_string()],
            ),
        )),
        Err(SearchError::StorageUnavailable(e)) => {
            error!("Search query failed: {}", e);
            Err(Json(storage_unavailable()))
        }
    }
}

fn storage_unavailable() -> StandardErrorResponse {
    StandardErrorResponse::new(
        "Job store is unavailable".to_string(),
        "STORAGE_UNAVAILABLE".to_string(),
        vec!["Try again in a few moments".to_string()],
    )
}
