//! Brand lookup routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::catalog::Paged;
use crate::error::{AppError, AppResult};
use crate::models::brand::Brand;
use crate::routes::helpers::resolve_paging;
use crate::state::AppState;

/// Create the brand router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/brands", get(list_brands))
        .route("/api/brands/{id}", get(get_brand))
}

#[derive(Deserialize)]
struct BrandQuery {
    brand_name: Option<String>,
    page: Option<u32>,
    page_size: Option<String>,
}

/// One page of brands, optionally filtered by name substring.
async fn list_brands(
    State(state): State<AppState>,
    Query(query): Query<BrandQuery>,
) -> AppResult<Json<Paged<Brand>>> {
    let (page, per_page) = resolve_paging(&state, query.page, query.page_size.as_deref())?;
    let name = query.brand_name.as_deref();
    let (brands, total) = tokio::try_join!(
        Brand::list_page(state.db(), name, page, per_page),
        Brand::count(state.db(), name),
    )?;
    Ok(Json(Paged::new(brands, total.max(0) as u64, page, per_page)))
}

/// Brand detail by id.
async fn get_brand(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Brand>> {
    let brand = Brand::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(brand))
}
