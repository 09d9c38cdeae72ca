// src/web/types.rs
use rocket::serde::Serialize;

use crate::core::SearchConfig;
use crate::models::{City, FunctionalArea, Industry, Qualification, Skill};
use crate::search::{JobPostView, SearchOutcome};

/// Search settings handed to handlers via managed state.
pub struct ServerConfig {
    pub search: SearchConfig,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

/// Which reference entities matched the literal filter text; rendered
/// as "you searched for" chips by the frontend.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SearchFacets {
    pub skills: Vec<Skill>,
    pub locations: Vec<City>,
    pub industries: Vec<Industry>,
    pub qualifications: Vec<Qualification>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SearchResultsData {
    pub total: usize,
    pub jobs: Vec<JobPostView>,
    pub facets: SearchFacets,
}

impl From<SearchOutcome> for SearchResultsData {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            total: outcome.posts.len(),
            jobs: outcome.posts,
            facets: SearchFacets {
                skills: outcome.matched_skills,
                locations: outcome.matched_locations,
                industries: outcome.matched_industries,
                qualifications: outcome.matched_qualifications,
            },
        }
    }
}

/// Reference lists for building filter UIs.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct MetadataData {
    pub skills: Vec<Skill>,
    pub industries: Vec<Industry>,
    pub locations: Vec<City>,
    pub qualifications: Vec<Qualification>,
    pub functional_areas: Vec<FunctionalArea>,
}
