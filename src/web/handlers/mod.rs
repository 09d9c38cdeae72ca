// src/web/handlers/mod.rs
pub mod health;
pub mod jobs;
pub mod metadata;
pub mod search;
