// src/search/params.rs
//! Filter parameter bag and its parsed form.
//!
//! The recognized keys are a closed enum rather than free strings, so
//! the set of filters the refiner honors is checkable at compile time.

use std::collections::BTreeMap;
use std::fmt;

use super::SearchError;

/// Job type value that short-circuits to the entry-level predicate
/// (`min_year <= 0`) instead of an equality match.
pub const FRESHER_JOB_TYPE: &str = "Fresher";

/// The filter keys the search endpoint recognizes. Anything else in
/// the query string is ignored upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FilterKey {
    RefineSkill,
    RefineLocation,
    JobType,
    RefineIndustry,
    RefineEducation,
    FunctionalArea,
    RefineExperienceMin,
    RefineExperienceMax,
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::RefineSkill => "refine_skill",
            FilterKey::RefineLocation => "refine_location",
            FilterKey::JobType => "job_type",
            FilterKey::RefineIndustry => "refine_industry",
            FilterKey::RefineEducation => "refine_education",
            FilterKey::FunctionalArea => "functional_area",
            FilterKey::RefineExperienceMin => "refine_experience_min",
            FilterKey::RefineExperienceMax => "refine_experience_max",
        }
    }

    pub fn from_str(key: &str) -> Option<Self> {
        match key {
            "refine_skill" => Some(FilterKey::RefineSkill),
            "refine_location" => Some(FilterKey::RefineLocation),
            "job_type" => Some(FilterKey::JobType),
            "refine_industry" => Some(FilterKey::RefineIndustry),
            "refine_education" => Some(FilterKey::RefineEducation),
            "functional_area" => Some(FilterKey::FunctionalArea),
            "refine_experience_min" => Some(FilterKey::RefineExperienceMin),
            "refine_experience_max" => Some(FilterKey::RefineExperienceMax),
            _ => None,
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multi-valued filter bag, as handed over by the request layer. Each
/// key carries zero or more values in submission order.
#[derive(Debug, Default, Clone)]
pub struct RawFilters(BTreeMap<FilterKey, Vec<String>>);

impl RawFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FilterKey, value: impl Into<String>) {
        self.0.entry(key).or_default().push(value.into());
    }

    pub fn extend(&mut self, key: FilterKey, values: impl IntoIterator<Item = String>) {
        self.0.entry(key).or_default().extend(values);
    }

    pub fn values(&self, key: FilterKey) -> &[String] {
        self.0.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, key: FilterKey) -> Option<&str> {
        self.values(key).first().map(String::as_str)
    }
}

/// Parsed search criteria. Blank values are dropped during parsing,
/// so an empty list or `None` always means "no constraint".
#[derive(Debug, Default, Clone)]
pub struct SearchCriteria {
    pub skills: Vec<String>,
    pub locations: Vec<String>,
    pub job_type: Option<String>,
    pub industries: Vec<String>,
    pub educations: Vec<String>,
    pub functional_areas: Vec<String>,
    pub experience_min: Option<i64>,
    pub experience_max: Option<i64>,
}

impl SearchCriteria {
    pub fn parse(filters: &RawFilters) -> Result<Self, SearchError> {
        Ok(Self {
            skills: non_blank(filters.values(FilterKey::RefineSkill)),
            locations: non_blank(filters.values(FilterKey::RefineLocation)),
            job_type: filters
                .first(FilterKey::JobType)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            industries: non_blank(filters.values(FilterKey::RefineIndustry)),
            educations: non_blank(filters.values(FilterKey::RefineEducation)),
            functional_areas: non_blank(filters.values(FilterKey::FunctionalArea)),
            experience_min: parse_year(filters, FilterKey::RefineExperienceMin)?,
            experience_max: parse_year(filters, FilterKey::RefineExperienceMax)?,
        })
    }

    /// No constraint from any key; the refiner will return every Live
    /// posting.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
            && self.locations.is_empty()
            && self.job_type.is_none()
            && self.industries.is_empty()
            && self.educations.is_empty()
            && self.functional_areas.is_empty()
            && self.experience_min.is_none()
            && self.experience_max.is_none()
    }
}

fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Experience bounds arrive as strings. Blank is inert; anything else
/// must parse as an integer (zero included) or the whole request is
/// rejected rather than silently widened.
fn parse_year(filters: &RawFilters, key: FilterKey) -> Result<Option<i64>, SearchError> {
    match filters.first(key).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| SearchError::InvalidFilterValue {
                key,
                value: raw.to_string(),
            }),
    }
}
