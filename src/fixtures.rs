// src/fixtures.rs
//! CSV reference-data seeding.
//!
//! Loads the named reference entities (countries, states, cities,
//! skills, industries, qualifications, functional areas) from a
//! fixtures directory. Inserts are `INSERT OR IGNORE`, so reloading
//! the same fixtures is a no-op.

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::utils::slugify;

#[derive(Debug, Deserialize)]
struct NamedRow {
    name: String,
}

#[derive(Debug, Deserialize)]
struct StateRow {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct CityRow {
    name: String,
    state: String,
}

pub struct FixtureLoader<'a> {
    pool: &'a SqlitePool,
    dir: PathBuf,
}

impl<'a> FixtureLoader<'a> {
    pub fn new(pool: &'a SqlitePool, dir: PathBuf) -> Self {
        Self { pool, dir }
    }

    /// Load every fixture file present in the directory. Files that
    /// are absent are skipped; states and cities whose parent rows are
    /// unknown are skipped with a warning.
    pub async fn load_all(&self) -> Result<()> {
        self.load_named("countries.csv", "countries").await?;
        self.load_states().await?;
        self.load_cities().await?;
        self.load_named("skills.csv", "skills").await?;
        self.load_named("industries.csv", "industries").await?;
        self.load_named("qualifications.csv", "qualifications").await?;
        self.load_named("functional_areas.csv", "functional_areas")
            .await?;
        Ok(())
    }

    async fn load_named(&self, file: &str, table: &str) -> Result<u64> {
        let path = self.dir.join(file);
        if !path.exists() {
            info!("No {} fixture at {}, skipping", table, path.display());
            return Ok(0);
        }

        let mut reader = csv::Reader::from_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let mut inserted = 0;
        for record in reader.deserialize::<NamedRow>() {
            let row = record.with_context(|| format!("Bad record in {}", path.display()))?;
            let sql = format!("INSERT OR IGNORE INTO {table} (name, slug) VALUES (?, ?)");
            inserted += sqlx::query(&sql)
                .bind(&row.name)
                .bind(slugify(&row.name))
                .execute(self.pool)
                .await?
                .rows_affected();
        }

        info!("Loaded {} rows into {}", inserted, table);
        Ok(inserted)
    }

    async fn load_states(&self) -> Result<u64> {
        let path = self.dir.join("states.csv");
        if !path.exists() {
            info!("No states fixture at {}, skipping", path.display());
            return Ok(0);
        }

        let mut reader = csv::Reader::from_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let mut inserted = 0;
        for record in reader.deserialize::<StateRow>() {
            let row = record.with_context(|| format!("Bad record in {}", path.display()))?;
            let country_id: Option<i64> =
                sqlx::query_scalar("SELECT id FROM countries WHERE name = ?")
                    .bind(&row.country)
                    .fetch_optional(self.pool)
                    .await?;
            let Some(country_id) = country_id else {
                warn!("Unknown country '{}' for state '{}'", row.country, row.name);
                continue;
            };
            inserted += sqlx::query(
                "INSERT OR IGNORE INTO states (name, slug, country_id) VALUES (?, ?, ?)",
            )
            .bind(&row.name)
            .bind(slugify(&row.name))
            .bind(country_id)
            .execute(self.pool)
            .await?
            .rows_affected();
        }

        info!("Loaded {} rows into states", inserted);
        Ok(inserted)
    }

    async fn load_cities(&self) -> Result<u64> {
        let path = self.dir.join("cities.csv");
        if !path.exists() {
            info!("No cities fixture at {}, skipping", path.display());
            return Ok(0);
        }

        let mut reader = csv::Reader::from_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let mut inserted = 0;
        for record in reader.deserialize::<CityRow>() {
            let row = record.with_context(|| format!("Bad record in {}", path.display()))?;
            let state_id: Option<i64> = sqlx::query_scalar("SELECT id FROM states WHERE name = ?")
                .bind(&row.state)
                .fetch_optional(self.pool)
                .await?;
            let Some(state_id) = state_id else {
                warn!("Unknown state '{}' for city '{}'", row.state, row.name);
                continue;
            };
            inserted += sqlx::query(
                "INSERT OR IGNORE INTO cities (name, slug, state_id) VALUES (?, ?, ?)",
            )
            .bind(&row.name)
            .bind(slugify(&row.name))
            .bind(state_id)
            .execute(self.pool)
            .await?
            .rows_affected();
        }

        info!("Loaded {} rows into cities", inserted);
        Ok(inserted)
    }
}
