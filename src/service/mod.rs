//! Service layer
//!
//! Contains read logic separated from HTTP handlers.
//! Services orchestrate database and request-scoped cache access.

mod catalog;

pub use catalog::{CatalogService, Listing};
