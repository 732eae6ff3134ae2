//! REST service managing product recommendations (cross-sell, upsell and
//! accessory links between products).
//!
//! Requests flow through [`routes`] into a [`db::RecommendationRepository`],
//! backed by PostgreSQL or, when no database is configured, by process memory.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

pub use routes::{create_router, AppState};
