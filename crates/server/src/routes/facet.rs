//! Reference-data routes: sizes, colors, countries, currencies.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::catalog::Paged;
use crate::error::{AppError, AppResult};
use crate::models::color::Color;
use crate::models::country::Country;
use crate::models::currency::Currency;
use crate::models::size::Size;
use crate::routes::helpers::{PageQuery, resolve_paging};
use crate::state::AppState;

/// Create the reference-data router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sizes", get(list_sizes))
        .route("/api/sizes/{id}", get(get_size))
        .route("/api/colors", get(list_colors))
        .route("/api/colors/{id}", get(get_color))
        .route("/api/countries", get(list_countries))
        .route("/api/countries/{id}", get(get_country))
        .route("/api/currencies", get(list_currencies))
        .route("/api/currencies/{id}", get(get_currency))
}

async fn list_sizes(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paged<Size>>> {
    let (page, per_page) = resolve_paging(&state, query.page, query.page_size.as_deref())?;
    let (sizes, total) = tokio::try_join!(
        Size::list_page(state.db(), page, per_page),
        Size::count(state.db()),
    )?;
    Ok(Json(Paged::new(sizes, total.max(0) as u64, page, per_page)))
}

async fn get_size(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Size>> {
    let size = Size::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(size))
}

async fn list_colors(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paged<Color>>> {
    let (page, per_page) = resolve_paging(&state, query.page, query.page_size.as_deref())?;
    let (colors, total) = tokio::try_join!(
        Color::list_page(state.db(), page, per_page),
        Color::count(state.db()),
    )?;
    Ok(Json(Paged::new(colors, total.max(0) as u64, page, per_page)))
}

async fn get_color(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Color>> {
    let color = Color::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(color))
}

async fn list_countries(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paged<Country>>> {
    let (page, per_page) = resolve_paging(&state, query.page, query.page_size.as_deref())?;
    let (countries, total) = tokio::try_join!(
        Country::list_page(state.db(), page, per_page),
        Country::count(state.db()),
    )?;
    Ok(Json(Paged::new(countries, total.max(0) as u64, page, per_page)))
}

async fn get_country(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Country>> {
    let country = Country::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(country))
}

async fn list_currencies(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paged<Currency>>> {
    let (page, per_page) = resolve_paging(&state, query.page, query.page_size.as_deref())?;
    let (currencies, total) = tokio::try_join!(
        Currency::list_page(state.db(), page, per_page),
        Currency::count(state.db()),
    )?;
    Ok(Json(Paged::new(currencies, total.max(0) as u64, page, per_page)))
}

async fn get_currency(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Currency>> {
    let currency = Currency::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(currency))
}
