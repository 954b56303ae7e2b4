//! HTTP routes. All endpoints are read-only.

use axum::Router;

use crate::state::AppState;

pub mod brand;
pub mod category;
pub mod facet;
pub mod health;
pub mod helpers;
pub mod product;

/// Assemble the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(product::router())
        .merge(category::router())
        .merge(brand::router())
        .merge(facet::router())
}
