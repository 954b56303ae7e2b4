//! The listing entry point: scope resolution, query execution, assembly.

use std::sync::Arc;

use rust_decimal::Decimal;
use sea_query::PostgresQueryBuilder;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::product::ProductSummary;

use super::aggregates::FacetService;
use super::category_scope::{CategoryScope, CategoryService};
use super::filters::{listing_predicate, scope_predicate};
use super::pagination::PagePolicy;
use super::params::{ListingParams, SortKey};
use super::predicate::Predicate;
use super::query_builder::ProductQueryBuilder;

/// A listing response: matched count, price bounds of the matched set,
/// and one page of products.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub count: u64,
    pub next: Option<u32>,
    pub previous: Option<u32>,
    pub min_price_value: Option<Decimal>,
    pub max_price_value: Option<Decimal>,
    pub results: Vec<ProductSummary>,
}

impl ProductPage {
    fn assemble(
        results: Vec<ProductSummary>,
        count: u64,
        page: u32,
        per_page: u32,
        min_price_value: Option<Decimal>,
        max_price_value: Option<Decimal>,
    ) -> Self {
        let has_next = u64::from(page) * u64::from(per_page) < count;
        Self {
            count,
            next: has_next.then_some(page + 1),
            previous: (page > 1).then_some(page - 1),
            min_price_value,
            max_price_value,
            results,
        }
    }

    fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            min_price_value: None,
            max_price_value: None,
            results: Vec::new(),
        }
    }
}

/// Coordinates category scope resolution, the listing queries, and price
/// bounds for one request.
pub struct CatalogService {
    pool: PgPool,
    categories: Arc<CategoryService>,
    facets: FacetService,
    policy: PagePolicy,
}

impl CatalogService {
    pub fn new(pool: PgPool, categories: Arc<CategoryService>, policy: PagePolicy) -> Self {
        let facets = FacetService::new(pool.clone());
        Self {
            pool,
            categories,
            facets,
            policy,
        }
    }

    pub fn facets(&self) -> &FacetService {
        &self.facets
    }

    /// Run the faceted listing.
    pub async fn list_products(&self, params: &ListingParams) -> AppResult<ProductPage> {
        self.list_with(params, Predicate::True).await
    }

    /// Run the listing restricted to an explicit id set.
    pub async fn list_products_by_ids(
        &self,
        ids: &[i64],
        params: &ListingParams,
    ) -> AppResult<ProductPage> {
        if ids.is_empty() {
            return Err(AppError::BadRequest(
                "at least one product id is required".to_string(),
            ));
        }
        self.list_with(params, Predicate::IdIn(ids.to_vec())).await
    }

    async fn list_with(&self, params: &ListingParams, extra: Predicate) -> AppResult<ProductPage> {
        let per_page = self
            .policy
            .resolve(params.page_size.as_deref())
            .map_err(|error| AppError::BadRequest(error.to_string()))?;
        let page = params.page.unwrap_or(1).max(1);

        // Resolve the category scope once; every consumer of this request
        // sees the same closure.
        let scope = self
            .categories
            .resolve_scope(params.category, params.category_slug.as_deref())
            .await?;
        if matches!(scope, CategoryScope::Missing) {
            return Ok(ProductPage::empty());
        }

        let predicate = Predicate::all(vec![extra, listing_predicate(params, &scope)]);
        let sort = SortKey::from_param(params.sort.as_deref());
        let builder = ProductQueryBuilder::new(predicate, sort, params.currency);

        let listing_sql = builder
            .build_listing(page, per_page)
            .to_string(PostgresQueryBuilder);
        let count_sql = builder.build_count().to_string(PostgresQueryBuilder);

        // Bounds are computed over the category scope alone so they stay
        // stable while price-range and facet filters change.
        let scope_pred = scope_predicate(&scope);
        let (results, count, bounds) = tokio::join!(
            sqlx::query_as::<_, ProductSummary>(&listing_sql).fetch_all(&self.pool),
            sqlx::query_scalar::<_, i64>(&count_sql).fetch_one(&self.pool),
            self.facets.price_bounds(&scope_pred, params.currency),
        );
        let results = results?;
        let count = count?.max(0) as u64;

        Ok(ProductPage::assemble(
            results,
            count,
            page,
            per_page,
            bounds.min_price,
            bounds.max_price,
        ))
    }
}
