// src/web/handlers/metadata.rs
//! Reference-data endpoint: the lists a frontend needs to render the
//! search refinement controls.
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

use crate::database::DatabaseConfig;
use crate::models::{City, FunctionalArea, Industry, Qualification, Skill};
use crate::web::types::{DataResponse, MetadataData, StandardErrorResponse};

pub async fn metadata_handler(
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<MetadataData>>, Json<StandardErrorResponse>> {
    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database pool unavailable: {}", e);
            return Err(Json(storage_unavailable()));
        }
    };

    let result: Result<MetadataData, sqlx::Error> = async {
        let skills = sqlx::query_as::<_, Skill>("SELECT id, name, slug FROM skills ORDER BY name")
            .fetch_all(pool)
            .await?;
        let industries =
            sqlx::query_as::<_, Industry>("SELECT id, name, slug FROM industries ORDER BY name")
                .fetch_all(pool)
                .await?;
        let locations = sqlx::query_as::<_, City>(
            "SELECT id, name, slug, state_id FROM cities ORDER BY name",
        )
        .fetch_all(pool)
        .await?;
        let qualifications = sqlx::query_as::<_, Qualification>(
            "SELECT id, name, slug FROM qualifications ORDER BY name",
        )
        .fetch_all(pool)
        .await?;
        let functional_areas = sqlx::query_as::<_, FunctionalArea>(
            "SELECT id, name, slug FROM functional_areas ORDER BY name",
        )
        .fetch_all(pool)
        .await?;

        Ok(MetadataData {
            skills,
            industries,
            locations,
            qualifications,
            functional_areas,
        })
    }
    .await;

    match result {
        Ok(data) => Ok(Json(DataResponse::success(
            "Search metadata".to_string(),
            data,
        ))),
        Err(e) => {
            error!("Metadata query failed: {}", e);
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
