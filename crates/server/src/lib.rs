//! Vetrina catalog server.
//!
//! Read-only HTTP API over a faceted product catalog: hierarchical
//! category scoping, composable filters, distinct-product facet counts,
//! and paginated listings.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Build the application router with all routes attached.
pub fn app(state: AppState) -> Router {
    routes::router().with_state(state)
}
