//! Listing query parameters and sort-key mapping.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Query parameters accepted by the product listing endpoint.
///
/// Every filter is optional and independently composable; an absent
/// parameter never restricts results. Multi-valued parameters (`brand`,
/// `size`, `size_filter`, `country`) accept comma-separated values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    /// Category id; restricts to the category and its descendants.
    pub category: Option<i64>,

    /// Category slug, resolved to an id before filtering.
    pub category_slug: Option<String>,

    /// Brand ids, OR-combined.
    #[serde(default, deserialize_with = "comma_separated_i64")]
    pub brand: Vec<i64>,

    /// Brand name substring; AND-combined with `brand` when both given.
    pub brand_filter: Option<String>,

    /// Size ids, OR-combined.
    #[serde(default, deserialize_with = "comma_separated_i64")]
    pub size: Vec<i64>,

    /// Size label substrings, OR-combined with each other.
    #[serde(default, deserialize_with = "comma_separated_string")]
    pub size_filter: Vec<String>,

    /// Color id.
    pub color: Option<i64>,

    /// Color name substring; AND-combined with `color` when both given.
    pub color_filter: Option<String>,

    /// Country ids, OR-combined.
    #[serde(default, deserialize_with = "comma_separated_i64")]
    pub country: Vec<i64>,

    /// Currency id; also selects the representative listing price.
    pub currency: Option<i64>,

    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,

    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,

    /// Presence (true) / absence (false) of any price row.
    pub has_price: Option<bool>,

    /// Discounted products only (true) or undiscounted only (false).
    pub discount: Option<bool>,

    /// Products with a size row matching this availability flag.
    pub in_stock: Option<bool>,

    /// Free-text search over both titles and the brand name.
    pub search: Option<String>,

    /// Sort key; unrecognized values fall back to title ordering.
    pub sort: Option<String>,

    /// Page number, 1-indexed.
    pub page: Option<u32>,

    /// Requested page size; kept raw so validation can reject garbage
    /// instead of surfacing a deserialization error.
    pub page_size: Option<String>,
}

/// Sort order for the product listing.
///
/// Maps the wire-level sort keys onto orderings; anything unrecognized
/// (or absent) falls back to ascending Russian-title order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Title,
    Popularity {
        descending: bool,
    },
    Rating {
        descending: bool,
    },
    Price {
        descending: bool,
    },
}

impl SortKey {
    /// Resolve a raw `sort` parameter.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("popular") => SortKey::Popularity { descending: false },
            Some("popular_desc") => SortKey::Popularity { descending: true },
            Some("rating") => SortKey::Rating { descending: false },
            Some("rating_desc") => SortKey::Rating { descending: true },
            Some("price") => SortKey::Price { descending: false },
            Some("price_desc") => SortKey::Price { descending: true },
            _ => SortKey::Title,
        }
    }
}

fn comma_separated_i64<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid id: {s}")))
        })
        .collect()
}

fn comma_separated_string<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}
