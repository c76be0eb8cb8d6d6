//! Data layer module
//!
//! Handles all data persistence and caching:
//! - SQLite database operations
//! - Bundled seed data
//! - Request-scoped render cache (volatile)

mod cache;
mod database;
mod models;
mod seed;

pub use cache::{QueryKey, RenderCache};
pub use database::Database;
pub use models::*;
