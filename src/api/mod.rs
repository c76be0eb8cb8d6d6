//! API layer
//!
//! HTTP handlers for:
//! - Locale-prefixed HTML pages
//! - Author and quote JSON API
//! - Database seeding
//! - Metrics (Prometheus)

mod authors;
mod dto;
pub mod metrics;
mod pages;
mod quotes;
mod seed;

pub use dto::*;

pub use authors::authors_router;
pub use metrics::{metrics_router, track_http_metrics};
pub use pages::{not_found, not_found_response, pages_router};
pub use quotes::quotes_router;
pub use seed::seed_router;
