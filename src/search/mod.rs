// src/search/mod.rs
//! Job search refinement: filter parsing and query construction.
//!
//! The refiner runs direct relational predicates (exact, in-list,
//! case-insensitive substring, numeric comparison) against the
//! job-post store. An earlier iteration of the product routed this
//! through a full-text index engine; its substring and case handling
//! did not match what the search UI promises, so the index was
//! retired in favor of these queries.

pub mod params;
pub mod refine;

pub use params::{FilterKey, RawFilters, SearchCriteria};
pub use refine::{job_view_by_id, refined_search, JobPostView, SearchOutcome};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// An experience bound was supplied but is not an integer.
    #[error("invalid value for {key}: '{value}' is not an integer")]
    InvalidFilterValue { key: FilterKey, value: String },

    /// The job-post store could not serve the query. Propagated
    /// unchanged; retrying is the caller's decision.
    #[error("job store unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),
}
