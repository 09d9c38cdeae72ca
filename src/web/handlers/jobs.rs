// src/web/handlers/jobs.rs
//! Public job listing and detail handlers.
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

use crate::database::DatabaseConfig;
use crate::search::{job_view_by_id, refined_search, JobPostView, SearchCriteria};
use crate::web::types::{DataResponse, ServerConfig, StandardErrorResponse};

/// Every Live posting, newest first: the refiner with no constraints.
pub async fn list_jobs_handler(
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<JobPostView>>>, Json<StandardErrorResponse>> {
    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database pool unavailable: {}", e);
            return Err(Json(storage_unavailable()));
        }
    };

    match refined_search(pool, &config.search, &SearchCriteria::default()).await {
        Ok(outcome) => {
            let count = outcome.posts.len();
            Ok(Json(DataResponse::success(
                format!("{count} jobs live"),
                outcome.posts,
            )))
        }
        Err(e) => {
            error!("Job listing failed: {}", e);
            Err(Json(storage_unavailable()))
        }
    }
}

pub async fn job_detail_handler(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<JobPostView>>, Json<StandardErrorResponse>> {
    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database pool unavailable: {}", e);
            return Err(Json(storage_unavailable()));
        }
    };

    match job_view_by_id(pool, id).await {
        Ok(Some(view)) => Ok(Json(DataResponse::success(
            view.post.title.clone(),
            view,
        ))),
        Ok(None) => Err(Json(StandardErrorResponse::new(
            format!("No live job posting with id {id}"),
            "JOB_NOT_FOUND".to_string(),
            vec!["The posting may have been closed or unpublished".to_string()],
        ))),
        Err(e) => {
            error!("Job detail lookup failed: {}", e);
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
