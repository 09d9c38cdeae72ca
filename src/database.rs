// src/database.rs
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", self.database_path.display());

        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!("Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Database pool not initialized. Call init_pool() first.")
        })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        run_migrations(self.pool()?).await?;
        info!("Database migrations completed successfully");
        Ok(())
    }
}

/// Create the job-portal schema. Idempotent, so it also backs the
/// in-memory stores used in tests.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS countries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS states (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE,
            country_id INTEGER NOT NULL REFERENCES countries(id)
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS cities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE,
            state_id INTEGER NOT NULL REFERENCES states(id)
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS skills (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS industries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS qualifications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS functional_areas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE,
            website TEXT
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS job_posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            company_id INTEGER REFERENCES companies(id),
            functional_area_id INTEGER REFERENCES functional_areas(id),
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            job_role TEXT NOT NULL DEFAULT '',
            job_type TEXT NOT NULL DEFAULT 'Full Time',
            status TEXT NOT NULL DEFAULT 'Draft',
            min_year INTEGER NOT NULL DEFAULT 0,
            max_year INTEGER NOT NULL DEFAULT 0,
            published_on TEXT
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS job_post_skills (
            job_post_id INTEGER NOT NULL REFERENCES job_posts(id),
            skill_id INTEGER NOT NULL REFERENCES skills(id),
            PRIMARY KEY (job_post_id, skill_id)
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS job_post_locations (
            job_post_id INTEGER NOT NULL REFERENCES job_posts(id),
            city_id INTEGER NOT NULL REFERENCES cities(id),
            PRIMARY KEY (job_post_id, city_id)
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS job_post_industries (
            job_post_id INTEGER NOT NULL REFERENCES job_posts(id),
            industry_id INTEGER NOT NULL REFERENCES industries(id),
            PRIMARY KEY (job_post_id, industry_id)
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS job_post_qualifications (
            job_post_id INTEGER NOT NULL REFERENCES job_posts(id),
            qualification_id INTEGER NOT NULL REFERENCES qualifications(id),
            PRIMARY KEY (job_post_id, qualification_id)
        );
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_job_posts_status
        ON job_posts(status);
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_job_posts_published_on
        ON job_posts(published_on);
        "#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
