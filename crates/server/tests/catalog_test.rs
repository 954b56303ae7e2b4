#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Catalog query engine integration tests.
//!
//! Exercises the predicate builder, filter translation, sorting, and the
//! generated listing SQL without a live database.

use std::sync::Arc;

use rust_decimal::Decimal;
use sea_query::PostgresQueryBuilder;

use vetrina_server::catalog::filters::{listing_predicate, scope_predicate};
use vetrina_server::catalog::query_builder::ProductQueryBuilder;
use vetrina_server::catalog::{CategoryScope, ListingParams, Predicate, SortKey};

fn listing_sql(params: &ListingParams, scope: &CategoryScope) -> String {
    let predicate = listing_predicate(params, scope);
    let sort = SortKey::from_param(params.sort.as_deref());
    ProductQueryBuilder::new(predicate, sort, params.currency)
        .build_listing(1, 10)
        .to_string(PostgresQueryBuilder)
}

// -------------------------------------------------------------------------
// Deduplication
// -------------------------------------------------------------------------

#[test]
fn product_relation_is_never_row_multiplied() {
    // Every association-reaching filter at once; the product table must
    // still appear exactly once in the FROM clause, with the associations
    // reached through EXISTS.
    let params = ListingParams {
        brand: vec![1],
        size: vec![2, 3],
        size_filter: vec!["XL".to_string()],
        color: Some(4),
        color_filter: Some("red".to_string()),
        country: vec![5],
        currency: Some(1),
        min_price: Some(Decimal::new(10, 0)),
        max_price: Some(Decimal::new(100, 0)),
        has_price: Some(true),
        discount: Some(true),
        in_stock: Some(true),
        search: Some("boot".to_string()),
        ..Default::default()
    };
    let scope = CategoryScope::Within(Arc::new(vec![7, 8]));
    let sql = listing_sql(&params, &scope);

    assert_eq!(sql.matches("FROM \"product\"").count(), 1, "{sql}");
    assert!(sql.starts_with("SELECT DISTINCT"), "{sql}");
    assert!(sql.contains("EXISTS"), "{sql}");
    assert!(!sql.contains("JOIN \"product_category\""), "{sql}");
    assert!(!sql.contains("JOIN \"product_currency\""), "{sql}");
}

// -------------------------------------------------------------------------
// Filter composition
// -------------------------------------------------------------------------

#[test]
fn unsupplied_filters_do_not_restrict() {
    let p = listing_predicate(&ListingParams::default(), &CategoryScope::Unscoped);
    assert_eq!(p, Predicate::True);
}

#[test]
fn filters_intersect_not_union() {
    // brand=B1 AND size=M must land in one AND tree.
    let params = ListingParams {
        brand: vec![1],
        size: vec![2],
        ..Default::default()
    };
    let p = listing_predicate(&params, &CategoryScope::Unscoped);
    assert_eq!(
        p,
        Predicate::All(vec![
            Predicate::BrandIn(vec![1]),
            Predicate::HasSize {
                ids: vec![2],
                label_any: vec![],
            },
        ])
    );
}

#[test]
fn category_scope_covers_the_descendant_closure() {
    // Root -> {Shoes, Shirts}, Shoes -> {Sneakers}: scoping by Shoes
    // carries Sneakers too, so a Sneakers-only product matches.
    let shoes_closure = CategoryScope::Within(Arc::new(vec![2, 4]));
    let p = listing_predicate(&ListingParams::default(), &shoes_closure);
    assert_eq!(p, Predicate::InCategories(vec![2, 4]));

    let sql = listing_sql(&ListingParams::default(), &shoes_closure);
    assert!(
        sql.contains("\"product_category\".\"category_id\" IN (2, 4)"),
        "{sql}"
    );
}

#[test]
fn unknown_category_produces_an_empty_match() {
    let p = listing_predicate(&ListingParams::default(), &CategoryScope::Missing);
    assert_eq!(p, Predicate::False);

    let sql = listing_sql(&ListingParams::default(), &CategoryScope::Missing);
    assert!(sql.contains("FALSE"), "{sql}");
}

#[test]
fn price_range_and_currency_constrain_the_same_row() {
    let params = ListingParams {
        currency: Some(1),
        min_price: Some(Decimal::new(15, 0)),
        ..Default::default()
    };
    let sql = listing_sql(&params, &CategoryScope::Unscoped);
    // One EXISTS holds both the currency and the bound; separate EXISTS
    // blocks would accept a product priced 10 USD / 20 EUR for a
    // USD-min-15 query.
    let exists_block = sql
        .split("EXISTS")
        .find(|chunk| chunk.contains("\"product_currency\".\"currency_id\" = 1"))
        .expect("currency EXISTS block");
    assert!(
        exists_block.contains("\"product_currency\".\"price\" >= 15"),
        "{sql}"
    );
}

#[test]
fn search_matches_titles_and_brand_name() {
    let params = ListingParams {
        search: Some("sneak".to_string()),
        ..Default::default()
    };
    let sql = listing_sql(&params, &CategoryScope::Unscoped);
    assert!(sql.contains("\"product\".\"title_ru\" ILIKE '%sneak%'"), "{sql}");
    assert!(sql.contains("\"product\".\"title_en\" ILIKE '%sneak%'"), "{sql}");
    assert!(sql.contains("\"brand\".\"name\" ILIKE '%sneak%'"), "{sql}");
    assert!(sql.contains(" OR "), "{sql}");
}

// -------------------------------------------------------------------------
// Aggregation scope
// -------------------------------------------------------------------------

#[test]
fn aggregation_scope_ignores_listing_filters() {
    // The scope predicate for facet counts and price bounds depends only
    // on the category closure, never on the listing's filters.
    let scope = CategoryScope::Within(Arc::new(vec![3]));
    assert_eq!(scope_predicate(&scope), Predicate::InCategories(vec![3]));
    assert_eq!(scope_predicate(&CategoryScope::Unscoped), Predicate::True);
}

// -------------------------------------------------------------------------
// Sorting
// -------------------------------------------------------------------------

#[test]
fn sort_parameter_maps_onto_order_by() {
    let params = ListingParams {
        sort: Some("price_desc".to_string()),
        ..Default::default()
    };
    let sql = listing_sql(&params, &CategoryScope::Unscoped);
    assert!(sql.contains("\"price\" DESC NULLS LAST"), "{sql}");
}

#[test]
fn unknown_sort_falls_back_to_title() {
    let params = ListingParams {
        sort: Some("bogus".to_string()),
        ..Default::default()
    };
    let sql = listing_sql(&params, &CategoryScope::Unscoped);
    assert!(sql.contains("ORDER BY \"product\".\"title_ru\" ASC"), "{sql}");
}

// -------------------------------------------------------------------------
// Listing guard
// -------------------------------------------------------------------------

#[test]
fn listing_requires_at_least_one_variant() {
    let sql = listing_sql(&ListingParams::default(), &CategoryScope::Unscoped);
    assert!(
        sql.contains("\"product_variant\".\"product_id\" = \"product\".\"id\""),
        "{sql}"
    );
}
