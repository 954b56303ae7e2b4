//! Category routes: the tree itself and the per-category facet lists.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::Paged;
use crate::catalog::aggregates::{BrandFacet, ColorFacet, CountryFacet, SizeFacet};
use crate::error::{AppError, AppResult};
use crate::models::category::Category;
use crate::routes::helpers::{PageQuery, resolve_paging};
use crate::state::AppState;

/// Create the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/categories/{id}", get(get_category))
        .route("/api/categories/{id}/children", get(list_children))
        .route("/api/categories/{id}/brands", get(list_category_brands))
        .route("/api/categories/{id}/sizes", get(list_category_sizes))
        .route("/api/categories/{id}/colors", get(list_category_colors))
        .route("/api/categories/{id}/countries", get(list_category_countries))
}

#[derive(Serialize)]
struct CategoryTreeNode {
    #[serde(flatten)]
    category: Category,
    children: Vec<Category>,
}

/// One page of root categories, each with its direct children.
async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paged<CategoryTreeNode>>> {
    let (page, per_page) = resolve_paging(&state, query.page, query.page_size.as_deref())?;
    let (roots, total) = tokio::try_join!(
        Category::list_roots(state.db(), page, per_page),
        Category::count_roots(state.db()),
    )?;

    let mut nodes = Vec::with_capacity(roots.len());
    for root in roots {
        let children = Category::children(state.db(), root.id).await?;
        nodes.push(CategoryTreeNode {
            category: root,
            children,
        });
    }

    Ok(Json(Paged::new(nodes, total.max(0) as u64, page, per_page)))
}

/// Category detail by id.
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = Category::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(category))
}

/// Direct children of a category.
async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Category>>> {
    if Category::find_by_id(state.db(), id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let children = Category::children(state.db(), id).await?;
    Ok(Json(children))
}

#[derive(Debug, Default, Deserialize)]
struct FacetQuery {
    brand_name: Option<String>,
    name_size: Option<String>,
    name_color: Option<String>,
    name_country: Option<String>,
    page: Option<u32>,
    page_size: Option<String>,
}

/// Resolve the scope and paging shared by the facet endpoints. 404 when
/// the category does not exist; the scope is the descendant closure.
async fn facet_scope(
    state: &AppState,
    id: i64,
    query: &FacetQuery,
) -> AppResult<(Arc<Vec<i64>>, u32, u32)> {
    let (page, per_page) = resolve_paging(state, query.page, query.page_size.as_deref())?;

    let scope = state
        .categories()
        .descendants_including_self(id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((scope, page, per_page))
}

/// Brands available in a category subtree, with product counts.
async fn list_category_brands(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<FacetQuery>,
) -> AppResult<Json<Paged<BrandFacet>>> {
    let (scope, page, per_page) = facet_scope(&state, id, &query).await?;
    let facets = state
        .facets()
        .brand_facets(Some(scope.as_slice()), query.brand_name.as_deref(), page, per_page)
        .await;
    Ok(Json(facets))
}

/// Sizes available in a category subtree, with product counts.
async fn list_category_sizes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<FacetQuery>,
) -> AppResult<Json<Paged<SizeFacet>>> {
    let (scope, page, per_page) = facet_scope(&state, id, &query).await?;
    let facets = state
        .facets()
        .size_facets(Some(scope.as_slice()), query.name_size.as_deref(), page, per_page)
        .await;
    Ok(Json(facets))
}

/// Colors available in a category subtree, with product counts.
async fn list_category_colors(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<FacetQuery>,
) -> AppResult<Json<Paged<ColorFacet>>> {
    let (scope, page, per_page) = facet_scope(&state, id, &query).await?;
    let facets = state
        .facets()
        .color_facets(Some(scope.as_slice()), query.name_color.as_deref(), page, per_page)
        .await;
    Ok(Json(facets))
}

/// Manufacturing countries in a category subtree, with product counts.
async fn list_category_countries(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<FacetQuery>,
) -> AppResult<Json<Paged<CountryFacet>>> {
    let (scope, page, per_page) = facet_scope(&state, id, &query).await?;
    let facets = state
        .facets()
        .country_facets(Some(scope.as_slice()), query.name_country.as_deref(), page, per_page)
        .await;
    Ok(Json(facets))
}
