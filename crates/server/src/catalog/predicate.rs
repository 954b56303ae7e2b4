//! Immutable predicate tree for product filtering.
//!
//! Each filter dimension contributes one [`Predicate`]; the tree is combined
//! with AND across dimensions and OR within a multi-valued dimension, then
//! compiled into SeaQuery expressions. Leaves that reach through a
//! many-to-many association compile to `EXISTS` subqueries against the
//! association table, so the base `product` relation is never row-multiplied
//! by a filter.

use rust_decimal::Decimal;
use sea_query::extension::postgres::PgExpr;
use sea_query::{Cond, Expr, Query, SelectStatement, SimpleExpr};

use super::schema::{
    Brand, Color, Product, ProductCategory, ProductCountry, ProductCurrency, ProductSize,
    ProductVariant, Size,
};

/// A composable boolean condition over the product relation.
///
/// `True` is the contribution of an unsupplied filter; `False` is produced
/// by references to unknown categories so stale links degrade to an empty
/// listing instead of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    True,
    False,

    /// Logical AND of sub-predicates.
    All(Vec<Predicate>),

    /// Logical OR of sub-predicates.
    Any(Vec<Predicate>),

    /// Product id membership.
    IdIn(Vec<i64>),

    /// Brand id membership (brand is many-to-one, a direct column).
    BrandIn(Vec<i64>),

    /// Brand name contains the text, case-insensitive.
    BrandNameContains(String),

    /// Russian title contains the text, case-insensitive.
    TitleRuContains(String),

    /// English title contains the text, case-insensitive.
    TitleEnContains(String),

    /// Product appears in at least one of the given categories.
    InCategories(Vec<i64>),

    /// Product has a size association row with this availability flag.
    InStock(bool),

    /// One size association row satisfies every given constraint: its size
    /// id is in `ids` (when non-empty) and its raw label matches at least
    /// one of `label_any` (when non-empty).
    HasSize {
        ids: Vec<i64>,
        label_any: Vec<String>,
    },

    /// One color variant row satisfies every given constraint.
    HasVariant {
        color_id: Option<i64>,
        color_name: Option<String>,
    },

    /// Product is associated with at least one of the given countries.
    FromCountries(Vec<i64>),

    /// One currency row satisfies the currency and price-range constraints
    /// together. Bounds are inclusive.
    PricedWithin {
        currency_id: Option<i64>,
        min: Option<Decimal>,
        max: Option<Decimal>,
    },

    /// Presence (true) or absence (false) of any non-null price row.
    HasPrice(bool),

    /// True: some currency row carries discount_price > 0.
    /// False: no currency row carries discount_price > 0.
    Discounted(bool),
}

impl Predicate {
    /// AND-combine, dropping no-op fragments.
    pub fn all(fragments: Vec<Predicate>) -> Predicate {
        let mut kept: Vec<Predicate> = fragments
            .into_iter()
            .filter(|p| *p != Predicate::True)
            .collect();
        match kept.len() {
            0 => Predicate::True,
            1 => kept.remove(0),
            _ => Predicate::All(kept),
        }
    }

    /// Compile into a SeaQuery expression scoped to the `product` table.
    pub fn to_expr(&self) -> SimpleExpr {
        match self {
            Predicate::True => Expr::cust("TRUE"),
            Predicate::False => Expr::cust("FALSE"),

            Predicate::All(parts) => {
                let mut cond = Cond::all();
                for p in parts {
                    cond = cond.add(p.to_expr());
                }
                cond.into()
            }
            Predicate::Any(parts) => {
                let mut cond = Cond::any();
                for p in parts {
                    cond = cond.add(p.to_expr());
                }
                cond.into()
            }

            Predicate::IdIn(ids) => {
                Expr::col((Product::Table, Product::Id)).is_in(ids.iter().copied())
            }
            Predicate::BrandIn(ids) => {
                Expr::col((Product::Table, Product::BrandId)).is_in(ids.iter().copied())
            }

            Predicate::BrandNameContains(text) => {
                let mut sub = Query::select();
                sub.expr(Expr::val(1))
                    .from(Brand::Table)
                    .and_where(
                        Expr::col((Brand::Table, Brand::Id))
                            .equals((Product::Table, Product::BrandId)),
                    )
                    .and_where(
                        Expr::col((Brand::Table, Brand::Name)).ilike(contains_pattern(text)),
                    );
                Expr::exists(sub)
            }

            Predicate::TitleRuContains(text) => Expr::col((Product::Table, Product::TitleRu))
                .ilike(contains_pattern(text)),
            Predicate::TitleEnContains(text) => Expr::col((Product::Table, Product::TitleEn))
                .ilike(contains_pattern(text)),

            Predicate::InCategories(category_ids) => {
                let mut sub = association(ProductCategory::Table, ProductCategory::ProductId);
                sub.and_where(
                    Expr::col((ProductCategory::Table, ProductCategory::CategoryId))
                        .is_in(category_ids.iter().copied()),
                );
                Expr::exists(sub)
            }

            Predicate::InStock(available) => {
                let mut sub = association(ProductSize::Table, ProductSize::ProductId);
                sub.and_where(
                    Expr::col((ProductSize::Table, ProductSize::IsAvailable)).eq(*available),
                );
                Expr::exists(sub)
            }

            Predicate::HasSize { ids, label_any } => {
                let mut sub = association(ProductSize::Table, ProductSize::ProductId);
                if !ids.is_empty() {
                    sub.and_where(
                        Expr::col((ProductSize::Table, ProductSize::SizeId))
                            .is_in(ids.iter().copied()),
                    );
                }
                if !label_any.is_empty() {
                    sub.inner_join(
                        Size::Table,
                        Expr::col((Size::Table, Size::Id))
                            .equals((ProductSize::Table, ProductSize::SizeId)),
                    );
                    let mut labels = Cond::any();
                    for label in label_any {
                        labels = labels.add(
                            Expr::col((Size::Table, Size::RawSize)).ilike(contains_pattern(label)),
                        );
                    }
                    sub.cond_where(labels);
                }
                Expr::exists(sub)
            }

            Predicate::HasVariant {
                color_id,
                color_name,
            } => {
                let mut sub = association(ProductVariant::Table, ProductVariant::ProductId);
                if let Some(id) = color_id {
                    sub.and_where(
                        Expr::col((ProductVariant::Table, ProductVariant::ColorId)).eq(*id),
                    );
                }
                if let Some(name) = color_name {
                    sub.inner_join(
                        Color::Table,
                        Expr::col((Color::Table, Color::Id))
                            .equals((ProductVariant::Table, ProductVariant::ColorId)),
                    );
                    sub.and_where(
                        Expr::col((Color::Table, Color::Name)).ilike(contains_pattern(name)),
                    );
                }
                Expr::exists(sub)
            }

            Predicate::FromCountries(country_ids) => {
                let mut sub = association(ProductCountry::Table, ProductCountry::ProductId);
                sub.and_where(
                    Expr::col((ProductCountry::Table, ProductCountry::CountryId))
                        .is_in(country_ids.iter().copied()),
                );
                Expr::exists(sub)
            }

            Predicate::PricedWithin {
                currency_id,
                min,
                max,
            } => {
                let mut sub = association(ProductCurrency::Table, ProductCurrency::ProductId);
                if let Some(id) = currency_id {
                    sub.and_where(
                        Expr::col((ProductCurrency::Table, ProductCurrency::CurrencyId)).eq(*id),
                    );
                }
                if let Some(min) = min {
                    sub.and_where(
                        Expr::col((ProductCurrency::Table, ProductCurrency::Price)).gte(*min),
                    );
                }
                if let Some(max) = max {
                    sub.and_where(
                        Expr::col((ProductCurrency::Table, ProductCurrency::Price)).lte(*max),
                    );
                }
                Expr::exists(sub)
            }

            Predicate::HasPrice(has_price) => {
                let mut sub = association(ProductCurrency::Table, ProductCurrency::ProductId);
                sub.and_where(
                    Expr::col((ProductCurrency::Table, ProductCurrency::Price)).is_not_null(),
                );
                if *has_price {
                    Expr::exists(sub)
                } else {
                    Expr::exists(sub).not()
                }
            }

            Predicate::Discounted(discounted) => {
                let mut sub = association(ProductCurrency::Table, ProductCurrency::ProductId);
                sub.and_where(
                    Expr::col((ProductCurrency::Table, ProductCurrency::DiscountPrice))
                        .gt(Decimal::ZERO),
                );
                if *discounted {
                    Expr::exists(sub)
                } else {
                    Expr::exists(sub).not()
                }
            }
        }
    }
}

/// Start a correlated `EXISTS` subquery over an association table.
fn association<T, C>(table: T, product_fk: C) -> SelectStatement
where
    T: sea_query::Iden + Copy + 'static,
    C: sea_query::Iden + 'static,
{
    let mut sub = Query::select();
    sub.expr(Expr::val(1))
        .from(table)
        .and_where(Expr::col((table, product_fk)).equals((Product::Table, Product::Id)));
    sub
}

/// `%text%` with LIKE wildcard characters escaped, for ILIKE matching.
pub fn contains_pattern(text: &str) -> String {
    format!("%{}%", escape_like_wildcards(text))
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sea_query::PostgresQueryBuilder;

    fn render(p: &Predicate) -> String {
        Query::select()
            .column((Product::Table, Product::Id))
            .from(Product::Table)
            .and_where(p.to_expr())
            .to_string(PostgresQueryBuilder)
    }

    #[test]
    fn true_and_false_leaves() {
        assert!(render(&Predicate::True).contains("TRUE"));
        assert!(render(&Predicate::False).contains("FALSE"));
    }

    #[test]
    fn all_drops_noop_fragments() {
        let p = Predicate::all(vec![
            Predicate::True,
            Predicate::BrandIn(vec![1]),
            Predicate::True,
        ]);
        assert_eq!(p, Predicate::BrandIn(vec![1]));

        let empty = Predicate::all(vec![Predicate::True, Predicate::True]);
        assert_eq!(empty, Predicate::True);
    }

    #[test]
    fn brand_filter_uses_direct_column() {
        let sql = render(&Predicate::BrandIn(vec![3, 7]));
        assert!(sql.contains("\"product\".\"brand_id\" IN (3, 7)"), "{sql}");
        assert!(!sql.contains("EXISTS"), "{sql}");
    }

    #[test]
    fn category_filter_is_exists_subquery() {
        let sql = render(&Predicate::InCategories(vec![5, 6]));
        assert!(sql.contains("EXISTS"), "{sql}");
        assert!(sql.contains("\"product_category\""), "{sql}");
        assert!(
            sql.contains("\"product_category\".\"category_id\" IN (5, 6)"),
            "{sql}"
        );
        assert!(
            sql.contains("\"product_category\".\"product_id\" = \"product\".\"id\""),
            "{sql}"
        );
    }

    #[test]
    fn size_filter_constrains_one_row() {
        let sql = render(&Predicate::HasSize {
            ids: vec![2],
            label_any: vec!["XL".to_string()],
        });
        assert!(sql.contains("\"product_size\".\"size_id\" IN (2)"), "{sql}");
        assert!(sql.contains("INNER JOIN \"size\""), "{sql}");
        assert!(sql.contains("ILIKE '%XL%'"), "{sql}");
    }

    #[test]
    fn size_filter_without_labels_skips_join() {
        let sql = render(&Predicate::HasSize {
            ids: vec![2],
            label_any: vec![],
        });
        assert!(!sql.contains("INNER JOIN"), "{sql}");
    }

    #[test]
    fn variant_filter_with_color_name_joins_color() {
        let sql = render(&Predicate::HasVariant {
            color_id: Some(4),
            color_name: Some("red".to_string()),
        });
        assert!(sql.contains("\"product_variant\".\"color_id\" = 4"), "{sql}");
        assert!(sql.contains("INNER JOIN \"color\""), "{sql}");
        assert!(sql.contains("\"color\".\"name\" ILIKE '%red%'"), "{sql}");
    }

    #[test]
    fn price_range_scopes_one_currency_row() {
        let sql = render(&Predicate::PricedWithin {
            currency_id: Some(1),
            min: Some(Decimal::new(1000, 2)),
            max: Some(Decimal::new(5000, 2)),
        });
        assert!(
            sql.contains("\"product_currency\".\"currency_id\" = 1"),
            "{sql}"
        );
        assert!(sql.contains("\"product_currency\".\"price\" >= 10"), "{sql}");
        assert!(sql.contains("\"product_currency\".\"price\" <= 50"), "{sql}");
    }

    #[test]
    fn has_price_false_is_not_exists() {
        let sql = render(&Predicate::HasPrice(false));
        assert!(sql.contains("NOT EXISTS"), "{sql}");
        assert!(sql.contains("\"product_currency\".\"price\" IS NOT NULL"), "{sql}");
    }

    #[test]
    fn discount_false_excludes_discounted_rows() {
        let sql = render(&Predicate::Discounted(false));
        assert!(sql.contains("NOT EXISTS"), "{sql}");
        assert!(
            sql.contains("\"product_currency\".\"discount_price\" > 0"),
            "{sql}"
        );
    }

    #[test]
    fn search_composes_with_or() {
        let p = Predicate::Any(vec![
            Predicate::TitleRuContains("кросс".to_string()),
            Predicate::TitleEnContains("sneak".to_string()),
            Predicate::BrandNameContains("sneak".to_string()),
        ]);
        let sql = render(&p);
        assert!(sql.contains(" OR "), "{sql}");
        assert!(sql.contains("\"product\".\"title_en\" ILIKE '%sneak%'"), "{sql}");
        assert!(sql.contains("\"brand\".\"name\" ILIKE"), "{sql}");
    }

    #[test]
    fn like_wildcards_escaped() {
        let sql = render(&Predicate::TitleEnContains("100%_done".to_string()));
        assert!(
            sql.contains("100\\\\%\\\\_done") || sql.contains("100\\%\\_done"),
            "LIKE wildcards should be escaped: {sql}"
        );
    }

    #[test]
    fn escape_like_wildcards_function() {
        assert_eq!(escape_like_wildcards("hello"), "hello");
        assert_eq!(escape_like_wildcards("100%"), "100\\%");
        assert_eq!(escape_like_wildcards("a_b"), "a\\_b");
        assert_eq!(escape_like_wildcards("a\\b"), "a\\\\b");
    }
}
