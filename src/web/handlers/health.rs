// src/web/handlers/health.rs
use rocket::serde::json::Json;

use crate::web::types::TextResponse;

pub async fn health_handler() -> Json<TextResponse> {
    Json(TextResponse::success("Job portal API is up".to_string()))
}
