// src/search/refine.rs
//! Composite query construction over the job-post store.
//!
//! Every supplied filter narrows the candidate set (logical AND).
//! Association predicates run as EXISTS subqueries so a posting with
//! several matching skills or locations still comes back exactly once.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::params::{SearchCriteria, FRESHER_JOB_TYPE};
use super::SearchError;
use crate::core::SearchConfig;
use crate::models::{City, Company, Industry, JobPost, JobStatus, Qualification, Skill, User};

/// A posting with its associations resolved. The batch loaders below
/// fill these in with IN-list queries keyed by the result page, never
/// one query per posting.
#[derive(Debug, Clone, Serialize)]
pub struct JobPostView {
    #[serde(flatten)]
    pub post: JobPost,
    pub company: Option<Company>,
    pub posted_by: Option<User>,
    pub locations: Vec<City>,
    pub skills: Vec<Skill>,
    pub industries: Vec<Industry>,
}

/// Filtered postings plus the facet echoes: which reference entities
/// matched the literal filter text, independent of the result set.
#[derive(Debug, Default, Serialize)]
pub struct SearchOutcome {
    pub posts: Vec<JobPostView>,
    pub matched_skills: Vec<Skill>,
    pub matched_locations: Vec<City>,
    pub matched_industries: Vec<Industry>,
    pub matched_qualifications: Vec<Qualification>,
}

/// Run the refined search: Live postings matching every supplied
/// filter, newest first, with associations eagerly loaded.
pub async fn refined_search(
    pool: &SqlitePool,
    config: &SearchConfig,
    criteria: &SearchCriteria,
) -> Result<SearchOutcome, SearchError> {
    let posts = query_posts(pool, config, criteria).await?;
    let posts = load_views(pool, posts).await?;

    let matched_skills = match criteria.skills.first() {
        Some(term) => skills_matching(pool, term).await?,
        None => Vec::new(),
    };
    let matched_locations = cities_named(pool, &criteria.locations).await?;
    let matched_industries = industries_named(pool, &criteria.industries).await?;
    let matched_qualifications = qualifications_named(pool, &criteria.educations).await?;

    Ok(SearchOutcome {
        posts,
        matched_skills,
        matched_locations,
        matched_industries,
        matched_qualifications,
    })
}

/// Fetch a single Live posting with its associations resolved.
pub async fn job_view_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<JobPostView>, SearchError> {
    let post = sqlx::query_as::<_, JobPost>(
        "SELECT id, user_id, company_id, functional_area_id, title, slug, description, \
         job_role, job_type, status, min_year, max_year, published_on \
         FROM job_posts WHERE id = ? AND status = ?",
    )
    .bind(id)
    .bind(JobStatus::Live.as_str())
    .fetch_optional(pool)
    .await?;

    let Some(post) = post else {
        return Ok(None);
    };
    let mut views = load_views(pool, vec![post]).await?;
    Ok(views.pop())
}

async fn query_posts(
    pool: &SqlitePool,
    config: &SearchConfig,
    criteria: &SearchCriteria,
) -> Result<Vec<JobPost>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT jp.id, jp.user_id, jp.company_id, jp.functional_area_id, jp.title, jp.slug, \
         jp.description, jp.job_role, jp.job_type, jp.status, jp.min_year, jp.max_year, \
         jp.published_on FROM job_posts jp WHERE jp.status = ",
    );
    qb.push_bind(JobStatus::Live.as_str());

    // The substring predicate deliberately uses only the first skill
    // value; the exact-match predicates use the whole list.
    if let Some(first) = criteria.skills.first() {
        qb.push(" AND (jp.title IN ");
        push_text_list(&mut qb, &criteria.skills);
        qb.push(
            " OR EXISTS (SELECT 1 FROM job_post_skills js \
             JOIN skills s ON s.id = js.skill_id \
             WHERE js.job_post_id = jp.id AND instr(lower(s.name), lower(",
        );
        qb.push_bind(first.clone());
        qb.push(")) > 0)");
        qb.push(" OR jp.description IN ");
        push_text_list(&mut qb, &criteria.skills);
        qb.push(" OR jp.job_role IN ");
        push_text_list(&mut qb, &criteria.skills);
        qb.push(
            " OR EXISTS (SELECT 1 FROM job_post_qualifications jq \
             JOIN qualifications q ON q.id = jq.qualification_id \
             WHERE jq.job_post_id = jp.id AND q.name IN ",
        );
        push_text_list(&mut qb, &criteria.skills);
        qb.push("))");
    }

    if !criteria.locations.is_empty() {
        let sentinel = config.across_sentinel();
        if criteria.locations.iter().any(|l| *l == sentinel) {
            // Whole-country expansion: any city under the configured
            // home country. A country name with no stored row simply
            // matches nothing.
            qb.push(
                " AND EXISTS (SELECT 1 FROM job_post_locations jl \
                 JOIN cities c ON c.id = jl.city_id \
                 JOIN states st ON st.id = c.state_id \
                 JOIN countries co ON co.id = st.country_id \
                 WHERE jl.job_post_id = jp.id AND co.name = ",
            );
            qb.push_bind(config.home_country.clone());
            qb.push(")");
        } else {
            qb.push(
                " AND EXISTS (SELECT 1 FROM job_post_locations jl \
                 JOIN cities c ON c.id = jl.city_id \
                 WHERE jl.job_post_id = jp.id AND c.name IN ",
            );
            push_text_list(&mut qb, &criteria.locations);
            qb.push(")");
        }
    }

    if let Some(job_type) = &criteria.job_type {
        if job_type == FRESHER_JOB_TYPE {
            // Entry-level shortcut: zero or negative required
            // experience, regardless of the stored job_type value.
            qb.push(" AND jp.min_year <= 0");
        } else {
            qb.push(" AND jp.job_type = ");
            qb.push_bind(job_type.clone());
        }
    }

    if !criteria.industries.is_empty() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM job_post_industries ji \
             JOIN industries i ON i.id = ji.industry_id \
             WHERE ji.job_post_id = jp.id AND i.name IN ",
        );
        push_text_list(&mut qb, &criteria.industries);
        qb.push(")");
    }

    if !criteria.educations.is_empty() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM job_post_qualifications jq \
             JOIN qualifications q ON q.id = jq.qualification_id \
             WHERE jq.job_post_id = jp.id AND q.name IN ",
        );
        push_text_list(&mut qb, &criteria.educations);
        qb.push(")");
    }

    if !criteria.functional_areas.is_empty() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM functional_areas fa \
             WHERE fa.id = jp.functional_area_id AND fa.name IN ",
        );
        push_text_list(&mut qb, &criteria.functional_areas);
        qb.push(")");
    }

    if let Some(min) = criteria.experience_min {
        qb.push(" AND jp.min_year <= ");
        qb.push_bind(min);
    }

    if let Some(max) = criteria.experience_max {
        qb.push(" AND jp.max_year <= ");
        qb.push_bind(max);
    }

    // id tie-break keeps the order stable for equal timestamps.
    qb.push(" ORDER BY jp.published_on DESC, jp.id DESC");

    qb.build_query_as::<JobPost>().fetch_all(pool).await
}

fn push_text_list(qb: &mut QueryBuilder<'_, Sqlite>, values: &[String]) {
    qb.push("(");
    {
        let mut separated = qb.separated(", ");
        for value in values {
            separated.push_bind(value.clone());
        }
    }
    qb.push(")");
}

fn push_id_list(qb: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    qb.push("(");
    {
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
    }
    qb.push(")");
}

#[derive(sqlx::FromRow)]
struct PostSkillRow {
    job_post_id: i64,
    #[sqlx(flatten)]
    skill: Skill,
}

#[derive(sqlx::FromRow)]
struct PostCityRow {
    job_post_id: i64,
    #[sqlx(flatten)]
    city: City,
}

#[derive(sqlx::FromRow)]
struct PostIndustryRow {
    job_post_id: i64,
    #[sqlx(flatten)]
    industry: Industry,
}

/// Resolve companies, owners, and the to-many associations for the
/// result page in one query per association.
async fn load_views(
    pool: &SqlitePool,
    posts: Vec<JobPost>,
) -> Result<Vec<JobPostView>, sqlx::Error> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    let company_ids: Vec<i64> = posts.iter().filter_map(|p| p.company_id).collect();
    let user_ids: Vec<i64> = posts.iter().map(|p| p.user_id).collect();

    let mut skills = fetch_post_skills(pool, &ids).await?;
    let mut locations = fetch_post_locations(pool, &ids).await?;
    let mut industries = fetch_post_industries(pool, &ids).await?;
    let companies = fetch_companies(pool, &company_ids).await?;
    let users = fetch_users(pool, &user_ids).await?;

    Ok(posts
        .into_iter()
        .map(|post| JobPostView {
            company: post.company_id.and_then(|id| companies.get(&id).cloned()),
            posted_by: users.get(&post.user_id).cloned(),
            locations: locations.remove(&post.id).unwrap_or_default(),
            skills: skills.remove(&post.id).unwrap_or_default(),
            industries: industries.remove(&post.id).unwrap_or_default(),
            post,
        })
        .collect())
}

async fn fetch_post_skills(
    pool: &SqlitePool,
    ids: &[i64],
) -> Result<HashMap<i64, Vec<Skill>>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT js.job_post_id AS job_post_id, s.id AS id, s.name AS name, s.slug AS slug \
         FROM job_post_skills js JOIN skills s ON s.id = js.skill_id \
         WHERE js.job_post_id IN ",
    );
    push_id_list(&mut qb, ids);
    qb.push(" ORDER BY s.name");

    let rows = qb.build_query_as::<PostSkillRow>().fetch_all(pool).await?;
    let mut grouped: HashMap<i64, Vec<Skill>> = HashMap::new();
    for row in rows {
        grouped.entry(row.job_post_id).or_default().push(row.skill);
    }
    Ok(grouped)
}

async fn fetch_post_locations(
    pool: &SqlitePool,
    ids: &[i64],
) -> Result<HashMap<i64, Vec<City>>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT jl.job_post_id AS job_post_id, c.id AS id, c.name AS name, c.slug AS slug, \
         c.state_id AS state_id \
         FROM job_post_locations jl JOIN cities c ON c.id = jl.city_id \
         WHERE jl.job_post_id IN ",
    );
    push_id_list(&mut qb, ids);
    qb.push(" ORDER BY c.name");

    let rows = qb.build_query_as::<PostCityRow>().fetch_all(pool).await?;
    let mut grouped: HashMap<i64, Vec<City>> = HashMap::new();
    for row in rows {
        grouped.entry(row.job_post_id).or_default().push(row.city);
    }
    Ok(grouped)
}

async fn fetch_post_industries(
    pool: &SqlitePool,
    ids: &[i64],
) -> Result<HashMap<i64, Vec<Industry>>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT ji.job_post_id AS job_post_id, i.id AS id, i.name AS name, i.slug AS slug \
         FROM job_post_industries ji JOIN industries i ON i.id = ji.industry_id \
         WHERE ji.job_post_id IN ",
    );
    push_id_list(&mut qb, ids);
    qb.push(" ORDER BY i.name");

    let rows = qb.build_query_as::<PostIndustryRow>().fetch_all(pool).await?;
    let mut grouped: HashMap<i64, Vec<Industry>> = HashMap::new();
    for row in rows {
        grouped.entry(row.job_post_id).or_default().push(row.industry);
    }
    Ok(grouped)
}

async fn fetch_companies(
    pool: &SqlitePool,
    ids: &[i64],
) -> Result<HashMap<i64, Company>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, name, slug, website FROM companies WHERE id IN ");
    push_id_list(&mut qb, ids);

    let rows = qb.build_query_as::<Company>().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|c| (c.id, c)).collect())
}

async fn fetch_users(
    pool: &SqlitePool,
    ids: &[i64],
) -> Result<HashMap<i64, User>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, email, name FROM users WHERE id IN ");
    push_id_list(&mut qb, ids);

    let rows = qb.build_query_as::<User>().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|u| (u.id, u)).collect())
}

/// Skills whose name contains the term, case-insensitively. Computed
/// against the full skill table, not the filtered postings.
async fn skills_matching(pool: &SqlitePool, term: &str) -> Result<Vec<Skill>, sqlx::Error> {
    sqlx::query_as::<_, Skill>(
        "SELECT id, name, slug FROM skills \
         WHERE instr(lower(name), lower(?)) > 0 ORDER BY name",
    )
    .bind(term)
    .fetch_all(pool)
    .await
}

async fn cities_named(pool: &SqlitePool, names: &[String]) -> Result<Vec<City>, sqlx::Error> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, name, slug, state_id FROM cities WHERE name IN ");
    push_text_list(&mut qb, names);
    qb.push(" ORDER BY name");

    qb.build_query_as::<City>().fetch_all(pool).await
}

async fn industries_named(
    pool: &SqlitePool,
    names: &[String],
) -> Result<Vec<Industry>, sqlx::Error> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, name, slug FROM industries WHERE name IN ");
    push_text_list(&mut qb, names);
    qb.push(" ORDER BY name");

    qb.build_query_as::<Industry>().fetch_all(pool).await
}

async fn qualifications_named(
    pool: &SqlitePool,
    names: &[String],
) -> Result<Vec<Qualification>, sqlx::Error> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, name, slug FROM qualifications WHERE name IN ");
    push_text_list(&mut qb, names);
    qb.push(" ORDER BY name");

    qb.build_query_as::<Qualification>().fetch_all(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::run_migrations;
    use crate::search::params::{FilterKey, RawFilters};
    use crate::utils::slugify;
    use chrono::{DateTime, TimeZone, Utc};
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::atomic::{AtomicI64, Ordering};

    static SLUG_SEQ: AtomicI64 = AtomicI64::new(0);

    async fn memory_pool() -> SqlitePool {
        // Single connection so every query sees the same in-memory db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        run_migrations(&pool).await.expect("migrations");
        pool
    }

    fn india_config() -> SearchConfig {
        SearchConfig {
            home_country: "India".to_string(),
        }
    }

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap()
    }

    async fn insert_named(pool: &SqlitePool, table: &str, name: &str) -> i64 {
        let sql = format!("INSERT INTO {table} (name, slug) VALUES (?, ?)");
        sqlx::query(&sql)
            .bind(name)
            .bind(slugify(name))
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    async fn insert_state(pool: &SqlitePool, name: &str, country_id: i64) -> i64 {
        sqlx::query("INSERT INTO states (name, slug, country_id) VALUES (?, ?, ?)")
            .bind(name)
            .bind(slugify(name))
            .bind(country_id)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    async fn insert_city(pool: &SqlitePool, name: &str, state_id: i64) -> i64 {
        sqlx::query("INSERT INTO cities (name, slug, state_id) VALUES (?, ?, ?)")
            .bind(name)
            .bind(slugify(name))
            .bind(state_id)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    struct Store {
        pool: SqlitePool,
        user_id: i64,
        company_id: i64,
        hyderabad: i64,
        bangalore: i64,
        new_york: i64,
        python: i64,
        css: i64,
        css3: i64,
        rust: i64,
        it: i64,
        banking: i64,
        btech: i64,
        mba: i64,
        engineering: i64,
        sales: i64,
    }

    async fn seeded_store() -> Store {
        let pool = memory_pool().await;

        let india = insert_named(&pool, "countries", "India").await;
        let usa = insert_named(&pool, "countries", "United States").await;
        let telangana = insert_state(&pool, "Telangana", india).await;
        let karnataka = insert_state(&pool, "Karnataka", india).await;
        let ny_state = insert_state(&pool, "New York", usa).await;
        let hyderabad = insert_city(&pool, "Hyderabad", telangana).await;
        let bangalore = insert_city(&pool, "Bangalore", karnataka).await;
        let new_york = insert_city(&pool, "New York City", ny_state).await;

        let python = insert_named(&pool, "skills", "Python").await;
        let css = insert_named(&pool, "skills", "CSS").await;
        let css3 = insert_named(&pool, "skills", "CSS3").await;
        let rust = insert_named(&pool, "skills", "Rust").await;

        let it = insert_named(&pool, "industries", "Information Technology").await;
        let banking = insert_named(&pool, "industries", "Banking").await;

        let btech = insert_named(&pool, "qualifications", "B.Tech").await;
        let mba = insert_named(&pool, "qualifications", "MBA").await;

        let engineering = insert_named(&pool, "functional_areas", "Engineering").await;
        let sales = insert_named(&pool, "functional_areas", "Sales").await;

        let company_id =
            sqlx::query("INSERT INTO companies (name, slug, website) VALUES (?, ?, ?)")
                .bind("Acme Corp")
                .bind("acme-corp")
                .bind("https://acme.example")
                .execute(&pool)
                .await
                .unwrap()
                .last_insert_rowid();

        let user_id = sqlx::query("INSERT INTO users (email, name) VALUES (?, ?)")
            .bind("recruiter@acme.example")
            .bind("Acme Recruiter")
            .execute(&pool)
            .await
            .unwrap()
            .last_insert_rowid();

        Store {
            pool,
            user_id,
            company_id,
            hyderabad,
            bangalore,
            new_york,
            python,
            css,
            css3,
            rust,
            it,
            banking,
            btech,
            mba,
            engineering,
            sales,
        }
    }

    struct JobSpec<'a> {
        title: &'a str,
        status: JobStatus,
        job_type: &'a str,
        min_year: i64,
        max_year: i64,
        published_on: DateTime<Utc>,
        skills: &'a [i64],
        cities: &'a [i64],
        industries: &'a [i64],
        qualifications: &'a [i64],
        functional_area: Option<i64>,
    }

    impl Default for JobSpec<'_> {
        fn default() -> Self {
            Self {
                title: "Untitled",
                status: JobStatus::Live,
                job_type: "Full Time",
                min_year: 1,
                max_year: 4,
                published_on: ts(1),
                skills: &[],
                cities: &[],
                industries: &[],
                qualifications: &[],
                functional_area: None,
            }
        }
    }

    async fn insert_job(store: &Store, spec: JobSpec<'_>) -> i64 {
        let slug = format!(
            "{}-{}",
            slugify(spec.title),
            SLUG_SEQ.fetch_add(1, Ordering::Relaxed)
        );
        let id = sqlx::query(
            "INSERT INTO job_posts (user_id, company_id, functional_area_id, title, slug, \
             description, job_role, job_type, status, min_year, max_year, published_on) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(store.user_id)
        .bind(store.company_id)
        .bind(spec.functional_area)
        .bind(spec.title)
        .bind(slug)
        .bind(format!("{} role description", spec.title))
        .bind(spec.title)
        .bind(spec.job_type)
        .bind(spec.status.as_str())
        .bind(spec.min_year)
        .bind(spec.max_year)
        .bind(spec.published_on)
        .execute(&store.pool)
        .await
        .unwrap()
        .last_insert_rowid();

        for skill_id in spec.skills {
            sqlx::query("INSERT INTO job_post_skills (job_post_id, skill_id) VALUES (?, ?)")
                .bind(id)
                .bind(skill_id)
                .execute(&store.pool)
                .await
                .unwrap();
        }
        for city_id in spec.cities {
            sqlx::query("INSERT INTO job_post_locations (job_post_id, city_id) VALUES (?, ?)")
                .bind(id)
                .bind(city_id)
                .execute(&store.pool)
                .await
                .unwrap();
        }
        for industry_id in spec.industries {
            sqlx::query("INSERT INTO job_post_industries (job_post_id, industry_id) VALUES (?, ?)")
                .bind(id)
                .bind(industry_id)
                .execute(&store.pool)
                .await
                .unwrap();
        }
        for qualification_id in spec.qualifications {
            sqlx::query(
                "INSERT INTO job_post_qualifications (job_post_id, qualification_id) \
                 VALUES (?, ?)",
            )
            .bind(id)
            .bind(qualification_id)
            .execute(&store.pool)
            .await
            .unwrap();
        }

        id
    }

    fn criteria(build: impl FnOnce(&mut RawFilters)) -> SearchCriteria {
        let mut filters = RawFilters::new();
        build(&mut filters);
        SearchCriteria::parse(&filters).unwrap()
    }

    #[tokio::test]
    async fn test_empty_criteria_returns_all_live_newest_first() {
        let store = seeded_store().await;
        let older = insert_job(
            &store,
            JobSpec {
                title: "Backend Engineer",
                published_on: ts(1),
                ..Default::default()
            },
        )
        .await;
        let newer = insert_job(
            &store,
            JobSpec {
                title: "Data Engineer",
                published_on: ts(10),
                ..Default::default()
            },
        )
        .await;
        insert_job(
            &store,
            JobSpec {
                title: "Hidden Draft",
                status: JobStatus::Draft,
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(&store.pool, &india_config(), &SearchCriteria::default())
            .await
            .unwrap();

        let ids: Vec<i64> = outcome.posts.iter().map(|v| v.post.id).collect();
        assert_eq!(ids, vec![newer, older]);
        assert!(outcome.matched_skills.is_empty());
        assert!(outcome.matched_locations.is_empty());
        assert!(outcome.matched_industries.is_empty());
        assert!(outcome.matched_qualifications.is_empty());
    }

    #[tokio::test]
    async fn test_only_live_postings_surface() {
        let store = seeded_store().await;
        for status in [
            JobStatus::Draft,
            JobStatus::Pending,
            JobStatus::Closed,
            JobStatus::Expired,
        ] {
            insert_job(
                &store,
                JobSpec {
                    title: "CSS Specialist",
                    status,
                    skills: &[store.css],
                    ..Default::default()
                },
            )
            .await;
        }
        let live = insert_job(
            &store,
            JobSpec {
                title: "CSS Lead",
                skills: &[store.css],
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| f.insert(FilterKey::RefineSkill, "css")),
        )
        .await
        .unwrap();

        let ids: Vec<i64> = outcome.posts.iter().map(|v| v.post.id).collect();
        assert_eq!(ids, vec![live]);
        assert!(outcome.posts.iter().all(|v| v.post.is_live()));
    }

    #[tokio::test]
    async fn test_skill_substring_match_is_case_insensitive() {
        let store = seeded_store().await;
        let id = insert_job(
            &store,
            JobSpec {
                title: "Frontend Developer",
                skills: &[store.css3],
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| f.insert(FilterKey::RefineSkill, "cSs")),
        )
        .await
        .unwrap();

        assert_eq!(outcome.posts.len(), 1);
        assert_eq!(outcome.posts[0].post.id, id);
    }

    #[tokio::test]
    async fn test_posting_with_multiple_matching_skills_appears_once() {
        let store = seeded_store().await;
        let id = insert_job(
            &store,
            JobSpec {
                title: "UI Engineer",
                skills: &[store.css, store.css3],
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| f.insert(FilterKey::RefineSkill, "css")),
        )
        .await
        .unwrap();

        let ids: Vec<i64> = outcome.posts.iter().map(|v| v.post.id).collect();
        assert_eq!(ids, vec![id]);
    }

    #[tokio::test]
    async fn test_substring_match_uses_first_skill_value_only() {
        let store = seeded_store().await;
        // Only matchable through the Python skill, which the second
        // value would hit if the substring predicate considered it.
        insert_job(
            &store,
            JobSpec {
                title: "Backend Engineer II",
                skills: &[store.python],
                ..Default::default()
            },
        )
        .await;
        let css_job = insert_job(
            &store,
            JobSpec {
                title: "UI Engineer II",
                skills: &[store.css3],
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| {
                f.insert(FilterKey::RefineSkill, "css");
                f.insert(FilterKey::RefineSkill, "python");
            }),
        )
        .await
        .unwrap();

        let ids: Vec<i64> = outcome.posts.iter().map(|v| v.post.id).collect();
        assert_eq!(ids, vec![css_job]);
    }

    #[tokio::test]
    async fn test_skill_filter_matches_exact_title() {
        let store = seeded_store().await;
        let id = insert_job(
            &store,
            JobSpec {
                title: "Growth Hacker",
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| f.insert(FilterKey::RefineSkill, "Growth Hacker")),
        )
        .await
        .unwrap();

        let ids: Vec<i64> = outcome.posts.iter().map(|v| v.post.id).collect();
        assert_eq!(ids, vec![id]);
    }

    #[tokio::test]
    async fn test_filters_compose_with_and() {
        let store = seeded_store().await;
        insert_job(
            &store,
            JobSpec {
                title: "CSS Lead II",
                skills: &[store.css],
                industries: &[store.it],
                ..Default::default()
            },
        )
        .await;

        // Skill matches, industry matches nothing Live: intersection
        // must be empty, not the union.
        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| {
                f.insert(FilterKey::RefineSkill, "css");
                f.insert(FilterKey::RefineIndustry, "Banking");
            }),
        )
        .await
        .unwrap();

        assert!(outcome.posts.is_empty());
        assert_eq!(outcome.matched_industries.len(), 1);
        assert_eq!(outcome.matched_industries[0].id, store.banking);
    }

    #[tokio::test]
    async fn test_location_filter_by_city_name() {
        let store = seeded_store().await;
        let hyd = insert_job(
            &store,
            JobSpec {
                title: "Hyderabad Role",
                cities: &[store.hyderabad],
                ..Default::default()
            },
        )
        .await;
        insert_job(
            &store,
            JobSpec {
                title: "Bangalore Role",
                cities: &[store.bangalore],
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| f.insert(FilterKey::RefineLocation, "Hyderabad")),
        )
        .await
        .unwrap();

        let ids: Vec<i64> = outcome.posts.iter().map(|v| v.post.id).collect();
        assert_eq!(ids, vec![hyd]);
        assert_eq!(outcome.matched_locations.len(), 1);
        assert_eq!(outcome.matched_locations[0].id, store.hyderabad);
    }

    #[tokio::test]
    async fn test_across_country_sentinel_expands_to_home_country() {
        let store = seeded_store().await;
        let hyd = insert_job(
            &store,
            JobSpec {
                title: "Hyderabad Role II",
                cities: &[store.hyderabad],
                published_on: ts(3),
                ..Default::default()
            },
        )
        .await;
        let blr = insert_job(
            &store,
            JobSpec {
                title: "Bangalore Role II",
                cities: &[store.bangalore],
                published_on: ts(2),
                ..Default::default()
            },
        )
        .await;
        insert_job(
            &store,
            JobSpec {
                title: "New York Role",
                cities: &[store.new_york],
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| f.insert(FilterKey::RefineLocation, "Across India")),
        )
        .await
        .unwrap();

        let ids: Vec<i64> = outcome.posts.iter().map(|v| v.post.id).collect();
        assert_eq!(ids, vec![hyd, blr]);
    }

    #[tokio::test]
    async fn test_unknown_sentinel_country_yields_empty_branch() {
        let store = seeded_store().await;
        insert_job(
            &store,
            JobSpec {
                title: "Hyderabad Role III",
                cities: &[store.hyderabad],
                ..Default::default()
            },
        )
        .await;

        let config = SearchConfig {
            home_country: "Atlantis".to_string(),
        };
        let outcome = refined_search(
            &store.pool,
            &config,
            &criteria(|f| f.insert(FilterKey::RefineLocation, "Across Atlantis")),
        )
        .await
        .unwrap();

        assert!(outcome.posts.is_empty());
    }

    #[tokio::test]
    async fn test_fresher_means_zero_minimum_experience() {
        let store = seeded_store().await;
        // job_type deliberately not "Fresher": the shortcut must key
        // off min_year alone.
        let entry = insert_job(
            &store,
            JobSpec {
                title: "Junior Analyst",
                job_type: "Internship",
                min_year: 0,
                max_year: 1,
                ..Default::default()
            },
        )
        .await;
        insert_job(
            &store,
            JobSpec {
                title: "Senior Analyst",
                min_year: 4,
                max_year: 8,
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| f.insert(FilterKey::JobType, "Fresher")),
        )
        .await
        .unwrap();

        let ids: Vec<i64> = outcome.posts.iter().map(|v| v.post.id).collect();
        assert_eq!(ids, vec![entry]);
    }

    #[tokio::test]
    async fn test_non_fresher_job_type_matches_exactly() {
        let store = seeded_store().await;
        let part_time = insert_job(
            &store,
            JobSpec {
                title: "Evening Support",
                job_type: "Part Time",
                ..Default::default()
            },
        )
        .await;
        insert_job(
            &store,
            JobSpec {
                title: "Day Support",
                job_type: "Full Time",
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| f.insert(FilterKey::JobType, "Part Time")),
        )
        .await
        .unwrap();

        let ids: Vec<i64> = outcome.posts.iter().map(|v| v.post.id).collect();
        assert_eq!(ids, vec![part_time]);
    }

    #[tokio::test]
    async fn test_education_and_functional_area_filters() {
        let store = seeded_store().await;
        let engineer = insert_job(
            &store,
            JobSpec {
                title: "Platform Engineer",
                qualifications: &[store.btech],
                functional_area: Some(store.engineering),
                ..Default::default()
            },
        )
        .await;
        insert_job(
            &store,
            JobSpec {
                title: "Account Manager",
                qualifications: &[store.mba],
                functional_area: Some(store.sales),
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| {
                f.insert(FilterKey::RefineEducation, "B.Tech");
                f.insert(FilterKey::FunctionalArea, "Engineering");
            }),
        )
        .await
        .unwrap();

        let ids: Vec<i64> = outcome.posts.iter().map(|v| v.post.id).collect();
        assert_eq!(ids, vec![engineer]);
        assert_eq!(outcome.matched_qualifications.len(), 1);
        assert_eq!(outcome.matched_qualifications[0].id, store.btech);
    }

    #[tokio::test]
    async fn test_experience_bounds() {
        let store = seeded_store().await;
        let junior = insert_job(
            &store,
            JobSpec {
                title: "Junior Dev",
                min_year: 1,
                max_year: 3,
                ..Default::default()
            },
        )
        .await;
        insert_job(
            &store,
            JobSpec {
                title: "Staff Dev",
                min_year: 5,
                max_year: 10,
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| {
                f.insert(FilterKey::RefineExperienceMin, "2");
                f.insert(FilterKey::RefineExperienceMax, "4");
            }),
        )
        .await
        .unwrap();

        let ids: Vec<i64> = outcome.posts.iter().map(|v| v.post.id).collect();
        assert_eq!(ids, vec![junior]);
    }

    #[tokio::test]
    async fn test_ordering_is_deterministic_for_equal_timestamps() {
        let store = seeded_store().await;
        let first = insert_job(
            &store,
            JobSpec {
                title: "Role A",
                published_on: ts(5),
                ..Default::default()
            },
        )
        .await;
        let second = insert_job(
            &store,
            JobSpec {
                title: "Role B",
                published_on: ts(5),
                ..Default::default()
            },
        )
        .await;

        let config = india_config();
        let run_one = refined_search(&store.pool, &config, &SearchCriteria::default())
            .await
            .unwrap();
        let run_two = refined_search(&store.pool, &config, &SearchCriteria::default())
            .await
            .unwrap();

        let ids_one: Vec<i64> = run_one.posts.iter().map(|v| v.post.id).collect();
        let ids_two: Vec<i64> = run_two.posts.iter().map(|v| v.post.id).collect();
        assert_eq!(ids_one, ids_two);
        assert_eq!(ids_one, vec![second, first]);
    }

    #[tokio::test]
    async fn test_facets_are_independent_of_results() {
        let store = seeded_store().await;
        insert_named(&store.pool, "skills", "CSS Basics").await;
        // No live postings at all.

        let outcome = refined_search(
            &store.pool,
            &india_config(),
            &criteria(|f| f.insert(FilterKey::RefineSkill, "css")),
        )
        .await
        .unwrap();

        assert!(outcome.posts.is_empty());
        let names: Vec<&str> = outcome
            .matched_skills
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert!(names.contains(&"CSS Basics"));
        assert!(names.contains(&"CSS"));
        assert!(names.contains(&"CSS3"));
        assert!(!names.contains(&"Python"));
    }

    #[tokio::test]
    async fn test_views_carry_eager_associations() {
        let store = seeded_store().await;
        insert_job(
            &store,
            JobSpec {
                title: "Full Stack Engineer",
                skills: &[store.css, store.rust],
                cities: &[store.hyderabad, store.bangalore],
                industries: &[store.it],
                ..Default::default()
            },
        )
        .await;

        let outcome = refined_search(&store.pool, &india_config(), &SearchCriteria::default())
            .await
            .unwrap();

        assert_eq!(outcome.posts.len(), 1);
        let view = &outcome.posts[0];
        assert_eq!(view.company.as_ref().unwrap().name, "Acme Corp");
        assert_eq!(view.posted_by.as_ref().unwrap().name, "Acme Recruiter");
        assert_eq!(view.skills.len(), 2);
        assert_eq!(view.locations.len(), 2);
        assert_eq!(view.industries.len(), 1);
    }
}
