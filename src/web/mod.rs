// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::*;

use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, routes, Request, Response, State};
use tracing::info;

use crate::core::ConfigManager;
use crate::database::DatabaseConfig;
use crate::search::{FilterKey, JobPostView, RawFilters};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[get("/jobs/search?<refine_skill>&<refine_location>&<job_type>&<refine_industry>&\
       <refine_education>&<functional_area>&<refine_experience_min>&<refine_experience_max>")]
#[allow(clippy::too_many_arguments)]
pub async fn search_jobs(
    refine_skill: Vec<String>,
    refine_location: Vec<String>,
    job_type: Option<String>,
    refine_industry: Vec<String>,
    refine_education: Vec<String>,
    functional_area: Vec<String>,
    refine_experience_min: Option<String>,
    refine_experience_max: Option<String>,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<SearchResultsData>>, Json<StandardErrorResponse>> {
    let mut filters = RawFilters::new();
    filters.extend(FilterKey::RefineSkill, refine_skill);
    filters.extend(FilterKey::RefineLocation, refine_location);
    if let Some(value) = job_type {
        filters.insert(FilterKey::JobType, value);
    }
    filters.extend(FilterKey::RefineIndustry, refine_industry);
    filters.extend(FilterKey::RefineEducation, refine_education);
    filters.extend(FilterKey::FunctionalArea, functional_area);
    if let Some(value) = refine_experience_min {
        filters.insert(FilterKey::RefineExperienceMin, value);
    }
    if let Some(value) = refine_experience_max {
        filters.insert(FilterKey::RefineExperienceMax, value);
    }

    handlers::search::search_jobs_handler(filters, config, db_config).await
}

#[get("/jobs")]
pub async fn list_jobs(
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<JobPostView>>>, Json<StandardErrorResponse>> {
    handlers::jobs::list_jobs_handler(config, db_config).await
}

#[get("/jobs/<id>")]
pub async fn job_detail(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<JobPostView>>, Json<StandardErrorResponse>> {
    handlers::jobs::job_detail_handler(id, db_config).await
}

#[get("/metadata")]
pub async fn metadata(
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<MetadataData>>, Json<StandardErrorResponse>> {
    handlers::metadata::metadata_handler(db_config).await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec!["Check query parameter values".to_string()],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
    ))
}

// Main server start function
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    let server_config = ServerConfig {
        search: config.search.clone(),
    };

    let mut db_config = DatabaseConfig::new(config.environment.database_path.clone());
    db_config.init_pool().await?;
    db_config.migrate().await?;

    info!("Starting job portal API server");
    info!("Database: {}", db_config.database_path.display());
    info!(
        "Location sentinel: {}",
        server_config.search.across_sentinel()
    );

    rocket::build()
        .attach(Cors)
        .manage(server_config)
        .manage(db_config)
        .register("/api", catchers![bad_request, not_found, internal_error])
        .mount(
            "/api",
            routes![
                search_jobs,
                list_jobs,
                job_detail,
                metadata,
                health,
                options,
            ],
        )
        .launch()
        .await
        .context("Rocket server exited with an error")?;

    Ok(())
}
