//! Listing query assembly: columns, representative price, ordering, paging.

use sea_query::{
    Alias, Expr, Func, NullOrdering, Order, Query, SelectStatement, SimpleExpr,
};

use super::params::SortKey;
use super::predicate::Predicate;
use super::schema::{Product, ProductVariant};

/// Builds the product listing and its count query from one predicate, so
/// both always agree on the row set.
pub struct ProductQueryBuilder {
    predicate: Predicate,
    sort: SortKey,
    currency: Option<i64>,
}

impl ProductQueryBuilder {
    pub fn new(predicate: Predicate, sort: SortKey, currency: Option<i64>) -> Self {
        Self {
            predicate,
            sort,
            currency,
        }
    }

    /// The paged listing query. Selects one row per product (DISTINCT over
    /// the product id guards against accidental multiplication) with a
    /// representative price column aliased `price`.
    pub fn build_listing(&self, page: u32, per_page: u32) -> SelectStatement {
        let mut query = Query::select();
        query
            .distinct()
            .columns([
                (Product::Table, Product::Id),
                (Product::Table, Product::Article),
                (Product::Table, Product::TitleRu),
                (Product::Table, Product::TitleEn),
                (Product::Table, Product::Slug),
                (Product::Table, Product::Available),
                (Product::Table, Product::Rating),
                (Product::Table, Product::Popularity),
                (Product::Table, Product::BrandId),
            ])
            .expr_as(self.representative_price(), Alias::new("price"))
            .from(Product::Table)
            .and_where(has_any_variant())
            .and_where(self.predicate.to_expr());

        match self.sort {
            SortKey::Title => {
                query.order_by((Product::Table, Product::TitleRu), Order::Asc);
            }
            SortKey::Popularity { descending } => {
                query
                    .order_by((Product::Table, Product::Popularity), direction(descending))
                    .order_by((Product::Table, Product::TitleRu), Order::Asc);
            }
            SortKey::Rating { descending } => {
                query
                    .order_by((Product::Table, Product::Rating), direction(descending))
                    .order_by((Product::Table, Product::TitleRu), Order::Asc);
            }
            SortKey::Price { descending } => {
                // Unpriced products sort last either way.
                query
                    .order_by_with_nulls(
                        Alias::new("price"),
                        direction(descending),
                        NullOrdering::Last,
                    )
                    .order_by((Product::Table, Product::TitleRu), Order::Asc);
            }
        }

        let offset = u64::from(page.saturating_sub(1)) * u64::from(per_page);
        query.limit(u64::from(per_page)).offset(offset);
        query
    }

    /// The matching count query for the same predicate.
    pub fn build_count(&self) -> SelectStatement {
        let mut query = Query::select();
        query
            .expr(Func::count_distinct(Expr::col((
                Product::Table,
                Product::Id,
            ))))
            .from(Product::Table)
            .and_where(has_any_variant())
            .and_where(self.predicate.to_expr());
        query
    }

    /// Scalar subquery picking the listing price for a product row. When
    /// the request filtered on a currency that currency's price is shown;
    /// otherwise the row with the lowest currency id wins, which keeps the
    /// choice deterministic.
    fn representative_price(&self) -> SimpleExpr {
        let sql = match self.currency {
            Some(currency_id) => format!(
                "(SELECT pc.price FROM product_currency pc \
                 WHERE pc.product_id = \"product\".\"id\" AND pc.currency_id = {currency_id} \
                 LIMIT 1)"
            ),
            None => "(SELECT pc.price FROM product_currency pc \
                 WHERE pc.product_id = \"product\".\"id\" \
                 ORDER BY pc.currency_id LIMIT 1)"
                .to_string(),
        };
        Expr::cust(sql)
    }
}

/// Listings only show products with at least one variant row.
pub(crate) fn has_any_variant() -> SimpleExpr {
    let mut sub = Query::select();
    sub.expr(Expr::val(1)).from(ProductVariant::Table).and_where(
        Expr::col((ProductVariant::Table, ProductVariant::ProductId))
            .equals((Product::Table, Product::Id)),
    );
    Expr::exists(sub)
}

fn direction(descending: bool) -> Order {
    if descending {
        Order::Desc
    } else {
        Order::Asc
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use sea_query::PostgresQueryBuilder;

    use super::*;

    fn render(builder: &ProductQueryBuilder, page: u32, per_page: u32) -> String {
        builder
            .build_listing(page, per_page)
            .to_string(PostgresQueryBuilder)
    }

    #[test]
    fn listing_requires_a_variant() {
        let builder = ProductQueryBuilder::new(Predicate::True, SortKey::Title, None);
        let sql = render(&builder, 1, 10);
        assert!(sql.contains("SELECT DISTINCT"), "{sql}");
        assert!(sql.contains("EXISTS"), "{sql}");
        assert!(
            sql.contains("\"product_variant\".\"product_id\" = \"product\".\"id\""),
            "{sql}"
        );
    }

    #[test]
    fn default_sort_is_title_ascending() {
        let builder = ProductQueryBuilder::new(Predicate::True, SortKey::Title, None);
        let sql = render(&builder, 1, 10);
        assert!(sql.contains("ORDER BY \"product\".\"title_ru\" ASC"), "{sql}");
    }

    #[test]
    fn popularity_sort_keeps_title_tiebreak() {
        let builder = ProductQueryBuilder::new(
            Predicate::True,
            SortKey::Popularity { descending: true },
            None,
        );
        let sql = render(&builder, 1, 10);
        assert!(
            sql.contains("ORDER BY \"product\".\"popularity\" DESC, \"product\".\"title_ru\" ASC"),
            "{sql}"
        );
    }

    #[test]
    fn price_sort_orders_by_the_alias_nulls_last() {
        let builder =
            ProductQueryBuilder::new(Predicate::True, SortKey::Price { descending: false }, None);
        let sql = render(&builder, 1, 10);
        assert!(sql.contains("\"price\" ASC NULLS LAST"), "{sql}");
    }

    #[test]
    fn currency_filter_picks_that_currency_price() {
        let builder = ProductQueryBuilder::new(Predicate::True, SortKey::Title, Some(2));
        let sql = render(&builder, 1, 10);
        assert!(sql.contains("pc.currency_id = 2"), "{sql}");
    }

    #[test]
    fn no_currency_picks_lowest_currency_row() {
        let builder = ProductQueryBuilder::new(Predicate::True, SortKey::Title, None);
        let sql = render(&builder, 1, 10);
        assert!(sql.contains("ORDER BY pc.currency_id LIMIT 1"), "{sql}");
    }

    #[test]
    fn paging_maps_to_limit_offset() {
        let builder = ProductQueryBuilder::new(Predicate::True, SortKey::Title, None);
        let sql = render(&builder, 3, 25);
        assert!(sql.contains("LIMIT 25"), "{sql}");
        assert!(sql.contains("OFFSET 50"), "{sql}");
    }

    #[test]
    fn count_query_counts_distinct_products() {
        let builder = ProductQueryBuilder::new(Predicate::BrandIn(vec![1]), SortKey::Title, None);
        let sql = builder.build_count().to_string(PostgresQueryBuilder);
        assert!(sql.contains("COUNT(DISTINCT \"product\".\"id\")"), "{sql}");
        assert!(sql.contains("\"product\".\"brand_id\" IN (1)"), "{sql}");
        assert!(!sql.contains("LIMIT"), "{sql}");
    }
}
