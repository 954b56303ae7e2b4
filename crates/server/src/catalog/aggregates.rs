//! Facet aggregation over a category scope.
//!
//! Every facet count is a distinct-product count, computed against the same
//! product set the listing would return for that scope. Aggregation is
//! non-fatal by contract: a failed facet query logs and degrades to an
//! empty page so the surrounding response still renders.

use rust_decimal::Decimal;
use sea_query::extension::postgres::PgExpr;
use sea_query::{Alias, Expr, Func, Order, PostgresQueryBuilder, Query, SelectStatement};
use serde::Serialize;
use sqlx::PgPool;

use super::pagination::Paged;
use super::predicate::{Predicate, contains_pattern};
use super::query_builder::has_any_variant;
use super::schema::{
    Brand, Country, Product, ProductCountry, ProductCurrency, ProductSize, ProductVariant, Size,
};
use super::schema::{Color, ProductCategory};

/// Inclusive price bounds of the matched product set.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PriceBounds {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BrandFacet {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub product_count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SizeFacet {
    pub id: i64,
    pub raw_size: String,
    pub international_size: Option<String>,
    pub russian_size: Option<String>,
    pub product_count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ColorFacet {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub product_count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CountryFacet {
    pub id: i64,
    pub name_ru: String,
    pub name_en: Option<String>,
    pub iso_code: Option<String>,
    pub flag_url: Option<String>,
    pub product_count: i64,
}

/// Computes facet counts and price bounds.
pub struct FacetService {
    pool: PgPool,
}

impl FacetService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// MIN/MAX price over the currency rows of the products matching the
    /// given predicate (the category scope, for listings). Restricted to
    /// the filtered currency when one was requested, so the bounds never
    /// mix currencies the client asked to exclude.
    pub async fn price_bounds(
        &self,
        predicate: &Predicate,
        currency: Option<i64>,
    ) -> PriceBounds {
        let mut matched = Query::select();
        matched
            .column((Product::Table, Product::Id))
            .from(Product::Table)
            .and_where(has_any_variant())
            .and_where(predicate.to_expr());

        let mut query = Query::select();
        query
            .expr(Func::min(Expr::col((
                ProductCurrency::Table,
                ProductCurrency::Price,
            ))))
            .expr(Func::max(Expr::col((
                ProductCurrency::Table,
                ProductCurrency::Price,
            ))))
            .from(ProductCurrency::Table)
            .and_where(
                Expr::col((ProductCurrency::Table, ProductCurrency::ProductId))
                    .in_subquery(matched),
            );
        if let Some(currency_id) = currency {
            query.and_where(
                Expr::col((ProductCurrency::Table, ProductCurrency::CurrencyId)).eq(currency_id),
            );
        }

        let sql = query.to_string(PostgresQueryBuilder);
        match sqlx::query_as::<_, (Option<Decimal>, Option<Decimal>)>(&sql)
            .fetch_one(&self.pool)
            .await
        {
            Ok((min_price, max_price)) => PriceBounds {
                min_price,
                max_price,
            },
            Err(error) => {
                tracing::error!(%error, "price bounds query failed");
                PriceBounds::default()
            }
        }
    }

    /// Brands present in the scope, with distinct-product counts. Ordered
    /// by brand name.
    pub async fn brand_facets(
        &self,
        scope_ids: Option<&[i64]>,
        search: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> Paged<BrandFacet> {
        let mut query = Query::select();
        query
            .columns([
                (Brand::Table, Brand::Id),
                (Brand::Table, Brand::Name),
                (Brand::Table, Brand::ImageUrl),
            ])
            .expr_as(
                Func::count_distinct(Expr::col((Product::Table, Product::Id))),
                Alias::new("product_count"),
            )
            .from(Brand::Table)
            .inner_join(
                Product::Table,
                Expr::col((Product::Table, Product::BrandId)).equals((Brand::Table, Brand::Id)),
            )
            .and_where(has_any_variant());
        if let Some(ids) = scope_ids {
            query.and_where(in_scope(ids));
        }
        if let Some(text) = search {
            query.and_where(Expr::col((Brand::Table, Brand::Name)).ilike(contains_pattern(text)));
        }
        query
            .group_by_columns([
                (Brand::Table, Brand::Id),
                (Brand::Table, Brand::Name),
                (Brand::Table, Brand::ImageUrl),
            ])
            .order_by((Brand::Table, Brand::Name), Order::Asc);

        self.facet_page(query, page, per_page, "brand facet query failed")
            .await
    }

    /// Sizes present in the scope, ordered by size id.
    pub async fn size_facets(
        &self,
        scope_ids: Option<&[i64]>,
        search: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> Paged<SizeFacet> {
        let mut query = Query::select();
        query
            .columns([
                (Size::Table, Size::Id),
                (Size::Table, Size::RawSize),
                (Size::Table, Size::InternationalSize),
                (Size::Table, Size::RussianSize),
            ])
            .expr_as(
                Func::count_distinct(Expr::col((Product::Table, Product::Id))),
                Alias::new("product_count"),
            )
            .from(Size::Table)
            .inner_join(
                ProductSize::Table,
                Expr::col((ProductSize::Table, ProductSize::SizeId)).equals((Size::Table, Size::Id)),
            )
            .inner_join(
                Product::Table,
                Expr::col((Product::Table, Product::Id))
                    .equals((ProductSize::Table, ProductSize::ProductId)),
            )
            .and_where(has_any_variant());
        if let Some(ids) = scope_ids {
            query.and_where(in_scope(ids));
        }
        if let Some(text) = search {
            query.and_where(Expr::col((Size::Table, Size::RawSize)).ilike(contains_pattern(text)));
        }
        query
            .group_by_columns([
                (Size::Table, Size::Id),
                (Size::Table, Size::RawSize),
                (Size::Table, Size::InternationalSize),
                (Size::Table, Size::RussianSize),
            ])
            .order_by((Size::Table, Size::Id), Order::Asc);

        self.facet_page(query, page, per_page, "size facet query failed")
            .await
    }

    /// Colors present in the scope, ordered by color id.
    pub async fn color_facets(
        &self,
        scope_ids: Option<&[i64]>,
        search: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> Paged<ColorFacet> {
        let mut query = Query::select();
        query
            .columns([
                (Color::Table, Color::Id),
                (Color::Table, Color::Name),
                (Color::Table, Color::Code),
            ])
            .expr_as(
                Func::count_distinct(Expr::col((Product::Table, Product::Id))),
                Alias::new("product_count"),
            )
            .from(Color::Table)
            .inner_join(
                ProductVariant::Table,
                Expr::col((ProductVariant::Table, ProductVariant::ColorId))
                    .equals((Color::Table, Color::Id)),
            )
            .inner_join(
                Product::Table,
                Expr::col((Product::Table, Product::Id))
                    .equals((ProductVariant::Table, ProductVariant::ProductId)),
            );
        if let Some(ids) = scope_ids {
            query.and_where(in_scope(ids));
        }
        if let Some(text) = search {
            query.and_where(Expr::col((Color::Table, Color::Name)).ilike(contains_pattern(text)));
        }
        query
            .group_by_columns([
                (Color::Table, Color::Id),
                (Color::Table, Color::Name),
                (Color::Table, Color::Code),
            ])
            .order_by((Color::Table, Color::Id), Order::Asc);

        self.facet_page(query, page, per_page, "color facet query failed")
            .await
    }

    /// Manufacturing countries present in the scope, ordered by Russian
    /// name.
    pub async fn country_facets(
        &self,
        scope_ids: Option<&[i64]>,
        search: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> Paged<CountryFacet> {
        let mut query = Query::select();
        query
            .columns([
                (Country::Table, Country::Id),
                (Country::Table, Country::NameRu),
                (Country::Table, Country::NameEn),
                (Country::Table, Country::IsoCode),
                (Country::Table, Country::FlagUrl),
            ])
            .expr_as(
                Func::count_distinct(Expr::col((Product::Table, Product::Id))),
                Alias::new("product_count"),
            )
            .from(Country::Table)
            .inner_join(
                ProductCountry::Table,
                Expr::col((ProductCountry::Table, ProductCountry::CountryId))
                    .equals((Country::Table, Country::Id)),
            )
            .inner_join(
                Product::Table,
                Expr::col((Product::Table, Product::Id))
                    .equals((ProductCountry::Table, ProductCountry::ProductId)),
            )
            .and_where(has_any_variant());
        if let Some(ids) = scope_ids {
            query.and_where(in_scope(ids));
        }
        if let Some(text) = search {
            query.and_where(
                Expr::col((Country::Table, Country::NameRu))
                    .ilike(contains_pattern(text))
                    .or(Expr::col((Country::Table, Country::NameEn))
                        .ilike(contains_pattern(text))),
            );
        }
        query
            .group_by_columns([
                (Country::Table, Country::Id),
                (Country::Table, Country::NameRu),
                (Country::Table, Country::NameEn),
                (Country::Table, Country::IsoCode),
                (Country::Table, Country::FlagUrl),
            ])
            .order_by((Country::Table, Country::NameRu), Order::Asc);

        self.facet_page(query, page, per_page, "country facet query failed")
            .await
    }

    /// Run a grouped facet query with paging. The total is the number of
    /// facet values, taken by counting the grouped rows.
    async fn facet_page<T>(
        &self,
        mut query: SelectStatement,
        page: u32,
        per_page: u32,
        failure: &'static str,
    ) -> Paged<T>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let count_sql = format!(
            "SELECT COUNT(*) FROM ({}) AS facet_values",
            query.to_string(PostgresQueryBuilder)
        );

        let offset = u64::from(page.saturating_sub(1)) * u64::from(per_page);
        query.limit(u64::from(per_page)).offset(offset);
        let sql = query.to_string(PostgresQueryBuilder);

        let total: i64 = match sqlx::query_scalar(&count_sql).fetch_one(&self.pool).await {
            Ok(total) => total,
            Err(error) => {
                tracing::error!(%error, "{failure}");
                return Paged::empty(page, per_page);
            }
        };

        match sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await {
            Ok(items) => Paged::new(items, total.max(0) as u64, page, per_page),
            Err(error) => {
                tracing::error!(%error, "{failure}");
                Paged::empty(page, per_page)
            }
        }
    }
}

/// Scope condition: the product appears in one of the closure's categories.
fn in_scope(scope_ids: &[i64]) -> sea_query::SimpleExpr {
    let mut sub = Query::select();
    sub.expr(Expr::val(1))
        .from(ProductCategory::Table)
        .and_where(
            Expr::col((ProductCategory::Table, ProductCategory::ProductId))
                .equals((Product::Table, Product::Id)),
        )
        .and_where(
            Expr::col((ProductCategory::Table, ProductCategory::CategoryId))
                .is_in(scope_ids.iter().copied()),
        );
    Expr::exists(sub)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn scope_condition_is_exists_over_the_closure() {
        let sql = Query::select()
            .column((Product::Table, Product::Id))
            .from(Product::Table)
            .and_where(in_scope(&[1, 2, 3]))
            .to_string(PostgresQueryBuilder);
        assert!(sql.contains("EXISTS"), "{sql}");
        assert!(
            sql.contains("\"product_category\".\"category_id\" IN (1, 2, 3)"),
            "{sql}"
        );
    }
}
