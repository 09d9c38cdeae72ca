// src/models.rs
//! Row types for the job-post store and its reference entities.
//!
//! The search path only ever reads these; creation and maintenance of
//! reference data happens through the fixture loader.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a job posting. Only `Live` postings are visible
/// to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Draft,
    Pending,
    Live,
    Closed,
    Expired,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "Draft",
            JobStatus::Pending => "Pending",
            JobStatus::Live => "Live",
            JobStatus::Closed => "Closed",
            JobStatus::Expired => "Expired",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobPost {
    pub id: i64,
    pub user_id: i64,
    pub company_id: Option<i64>,
    pub functional_area_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub job_role: String,
    pub job_type: String,
    pub status: String,
    pub min_year: i64,
    pub max_year: i64,
    pub published_on: Option<DateTime<Utc>>,
}

impl JobPost {
    pub fn is_live(&self) -> bool {
        self.status == JobStatus::Live.as_str()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Industry {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Qualification {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FunctionalArea {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// City. Hangs off a state, which hangs off a country; the
/// whole-country location filter walks that chain.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub state_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct State {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub country_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub website: Option<String>,
}

/// Recruiter account that owns a posting. Authentication lives in a
/// separate service; this is only the ownership record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(JobStatus::Live.as_str(), "Live");
        assert_eq!(JobStatus::Draft.to_string(), "Draft");
    }

    #[test]
    fn test_is_live() {
        let post = JobPost {
            id: 1,
            user_id: 1,
            company_id: None,
            functional_area_id: None,
            title: "t".into(),
            slug: "t".into(),
            description: String::new(),
            job_role: String::new(),
            job_type: "Full Time".into(),
            status: "Live".into(),
            min_year: 0,
            max_year: 2,
            published_on: None,
        };
        assert!(post.is_live());
    }
}
