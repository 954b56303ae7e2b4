//! Product listing and detail routes.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::catalog::{ListingParams, ProductPage};
use crate::error::{AppError, AppResult};
use crate::models::brand::Brand;
use crate::models::product::ProductDetail;
use crate::state::AppState;

/// Create the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/ids", post(list_products_by_ids))
        .route("/api/products/{id}", get(get_product))
        .route("/api/products/slug/{slug}", get(get_product_by_slug))
        .route("/api/brand/{id}/products", get(list_brand_products))
        .route("/api/categories/{id}/products", get(list_category_products))
}

/// Faceted product listing.
async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> AppResult<Json<ProductPage>> {
    let page = state.catalog().list_products(&params).await?;
    Ok(Json(page))
}

#[derive(Deserialize)]
struct IdsRequest {
    ids: Vec<i64>,
}

/// Listing restricted to an explicit id set. The filter parameters still
/// apply on top of the set.
async fn list_products_by_ids(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
    Json(request): Json<IdsRequest>,
) -> AppResult<Json<ProductPage>> {
    let page = state
        .catalog()
        .list_products_by_ids(&request.ids, &params)
        .await?;
    Ok(Json(page))
}

/// Product detail by id.
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductDetail>> {
    let product = ProductDetail::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(product))
}

/// Product detail by slug.
async fn get_product_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ProductDetail>> {
    let product = ProductDetail::find_by_slug(state.db(), &slug)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(product))
}

/// All products of one brand. 404 for an unknown brand, unlike the
/// `brand` listing filter which just matches nothing.
async fn list_brand_products(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ListingParams>,
) -> AppResult<Json<ProductPage>> {
    if Brand::find_by_id(state.db(), id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let params = ListingParams {
        brand: vec![id],
        ..params
    };
    let page = state.catalog().list_products(&params).await?;
    Ok(Json(page))
}

/// All products of one category subtree. The category must exist; the
/// listing then includes every descendant.
async fn list_category_products(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ListingParams>,
) -> AppResult<Json<ProductPage>> {
    if state
        .categories()
        .descendants_including_self(id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound);
    }

    let params = ListingParams {
        category: Some(id),
        ..params
    };
    let page = state.catalog().list_products(&params).await?;
    Ok(Json(page))
}
