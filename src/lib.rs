// src/lib.rs
pub mod core;
pub mod database;
pub mod fixtures;
pub mod models;
pub mod search;
pub mod utils;
pub mod web;

pub use crate::core::{ConfigManager, SearchConfig};
pub use crate::database::DatabaseConfig;
pub use crate::web::start_web_server;
