//! Translation of listing parameters into the predicate tree.
//!
//! One function per filter dimension; each returns [`Predicate::True`] when
//! its parameter is absent so composition never has to special-case missing
//! input.

use super::category_scope::CategoryScope;
use super::params::ListingParams;
use super::predicate::Predicate;

/// Build the full listing predicate from request parameters and the
/// resolved category scope.
pub fn listing_predicate(params: &ListingParams, scope: &CategoryScope) -> Predicate {
    Predicate::all(vec![
        category(scope),
        brand(params),
        size(params),
        color(params),
        country(params),
        price(params),
        has_price(params),
        discount(params),
        in_stock(params),
        search(params),
    ])
}

/// The category contribution alone. Facet aggregation runs against this
/// rather than the full listing predicate, so counts and price bounds
/// describe the whole scope regardless of the filters currently applied.
pub fn scope_predicate(scope: &CategoryScope) -> Predicate {
    category(scope)
}

fn category(scope: &CategoryScope) -> Predicate {
    match scope {
        CategoryScope::Unscoped => Predicate::True,
        CategoryScope::Within(ids) => Predicate::InCategories(ids.as_ref().clone()),
        // Unknown category: match nothing rather than erroring, so stale
        // links degrade to an empty listing.
        CategoryScope::Missing => Predicate::False,
    }
}

fn brand(params: &ListingParams) -> Predicate {
    let mut parts = Vec::new();
    if !params.brand.is_empty() {
        parts.push(Predicate::BrandIn(params.brand.clone()));
    }
    if let Some(name) = non_empty(params.brand_filter.as_deref()) {
        parts.push(Predicate::BrandNameContains(name.to_string()));
    }
    Predicate::all(parts)
}

fn size(params: &ListingParams) -> Predicate {
    let labels: Vec<String> = params
        .size_filter
        .iter()
        .filter(|s| !s.trim().is_empty())
        .cloned()
        .collect();
    if params.size.is_empty() && labels.is_empty() {
        return Predicate::True;
    }
    Predicate::HasSize {
        ids: params.size.clone(),
        label_any: labels,
    }
}

fn color(params: &ListingParams) -> Predicate {
    let name = non_empty(params.color_filter.as_deref());
    if params.color.is_none() && name.is_none() {
        return Predicate::True;
    }
    Predicate::HasVariant {
        color_id: params.color,
        color_name: name.map(str::to_string),
    }
}

fn country(params: &ListingParams) -> Predicate {
    if params.country.is_empty() {
        Predicate::True
    } else {
        Predicate::FromCountries(params.country.clone())
    }
}

fn price(params: &ListingParams) -> Predicate {
    if params.currency.is_none() && params.min_price.is_none() && params.max_price.is_none() {
        return Predicate::True;
    }
    Predicate::PricedWithin {
        currency_id: params.currency,
        min: params.min_price,
        max: params.max_price,
    }
}

fn has_price(params: &ListingParams) -> Predicate {
    match params.has_price {
        Some(flag) => Predicate::HasPrice(flag),
        None => Predicate::True,
    }
}

fn discount(params: &ListingParams) -> Predicate {
    match params.discount {
        Some(flag) => Predicate::Discounted(flag),
        None => Predicate::True,
    }
}

fn in_stock(params: &ListingParams) -> Predicate {
    match params.in_stock {
        Some(flag) => Predicate::InStock(flag),
        None => Predicate::True,
    }
}

fn search(params: &ListingParams) -> Predicate {
    let Some(text) = non_empty(params.search.as_deref()) else {
        return Predicate::True;
    };
    Predicate::Any(vec![
        Predicate::TitleRuContains(text.to_string()),
        Predicate::TitleEnContains(text.to_string()),
        Predicate::BrandNameContains(text.to_string()),
    ])
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn empty_params_match_everything() {
        let p = listing_predicate(&ListingParams::default(), &CategoryScope::Unscoped);
        assert_eq!(p, Predicate::True);
    }

    #[test]
    fn missing_category_matches_nothing() {
        let p = listing_predicate(&ListingParams::default(), &CategoryScope::Missing);
        assert_eq!(p, Predicate::False);
    }

    #[test]
    fn scoped_category_uses_closure_ids() {
        let scope = CategoryScope::Within(Arc::new(vec![1, 4, 9]));
        let p = listing_predicate(&ListingParams::default(), &scope);
        assert_eq!(p, Predicate::InCategories(vec![1, 4, 9]));
    }

    #[test]
    fn brand_id_and_name_are_and_combined() {
        let params = ListingParams {
            brand: vec![2, 3],
            brand_filter: Some("nik".to_string()),
            ..Default::default()
        };
        let p = listing_predicate(&params, &CategoryScope::Unscoped);
        assert_eq!(
            p,
            Predicate::All(vec![
                Predicate::BrandIn(vec![2, 3]),
                Predicate::BrandNameContains("nik".to_string()),
            ])
        );
    }

    #[test]
    fn size_ids_and_labels_share_one_leaf() {
        let params = ListingParams {
            size: vec![5],
            size_filter: vec!["XL".to_string(), "  ".to_string()],
            ..Default::default()
        };
        let p = listing_predicate(&params, &CategoryScope::Unscoped);
        assert_eq!(
            p,
            Predicate::HasSize {
                ids: vec![5],
                label_any: vec!["XL".to_string()],
            }
        );
    }

    #[test]
    fn currency_and_bounds_share_one_leaf() {
        let params = ListingParams {
            currency: Some(1),
            min_price: Some(Decimal::new(100, 0)),
            max_price: Some(Decimal::new(500, 0)),
            ..Default::default()
        };
        let p = listing_predicate(&params, &CategoryScope::Unscoped);
        assert_eq!(
            p,
            Predicate::PricedWithin {
                currency_id: Some(1),
                min: Some(Decimal::new(100, 0)),
                max: Some(Decimal::new(500, 0)),
            }
        );
    }

    #[test]
    fn search_spans_titles_and_brand() {
        let params = ListingParams {
            search: Some("boot".to_string()),
            ..Default::default()
        };
        let p = listing_predicate(&params, &CategoryScope::Unscoped);
        assert_eq!(
            p,
            Predicate::Any(vec![
                Predicate::TitleRuContains("boot".to_string()),
                Predicate::TitleEnContains("boot".to_string()),
                Predicate::BrandNameContains("boot".to_string()),
            ])
        );
    }

    #[test]
    fn blank_search_is_noop() {
        let params = ListingParams {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let p = listing_predicate(&params, &CategoryScope::Unscoped);
        assert_eq!(p, Predicate::True);
    }

    #[test]
    fn boolean_flags_map_both_ways() {
        let params = ListingParams {
            discount: Some(false),
            has_price: Some(true),
            in_stock: Some(true),
            ..Default::default()
        };
        let p = listing_predicate(&params, &CategoryScope::Unscoped);
        assert_eq!(
            p,
            Predicate::All(vec![
                Predicate::HasPrice(true),
                Predicate::Discounted(false),
                Predicate::InStock(true),
            ])
        );
    }
}
