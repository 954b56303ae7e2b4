//! Product models: the listing row and the full detail view.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use super::brand::Brand;
use super::category::Category;
use super::color::Color;
use super::country::Country;

/// One row of a product listing. `price` is the representative price
/// computed by the listing query and may be absent for unpriced products.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: i64,
    pub article: String,
    pub title_ru: String,
    pub title_en: Option<String>,
    pub slug: String,
    pub available: bool,
    pub rating: f64,
    pub popularity: i64,
    pub brand_id: Option<i64>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    article: String,
    title_ru: String,
    title_en: Option<String>,
    slug: String,
    available: bool,
    rating: f64,
    popularity: i64,
    brand_id: Option<i64>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

/// A price row in one currency.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductPrice {
    pub currency_id: i64,
    pub price: Option<Decimal>,
    pub discount_price: Option<Decimal>,
    pub available: bool,
}

/// A size offered for a product, with its availability flag.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSize {
    pub id: i64,
    pub raw_size: String,
    pub international_size: Option<String>,
    pub russian_size: Option<String>,
    pub is_available: bool,
}

/// The full product view with all associations. Associations a product
/// lacks come back as empty lists, never as errors.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub id: i64,
    pub article: String,
    pub title_ru: String,
    pub title_en: Option<String>,
    pub slug: String,
    pub available: bool,
    pub rating: f64,
    pub popularity: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub brand: Option<Brand>,
    pub prices: Vec<ProductPrice>,
    pub sizes: Vec<ProductSize>,
    pub colors: Vec<Color>,
    pub countries: Vec<Country>,
    pub categories: Vec<Category>,
}

const COLUMNS: &str =
    "id, article, title_ru, title_en, slug, available, rating, popularity, brand_id, created, updated";

impl ProductDetail {
    /// Fetch a product and its associations by id.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch product")?;

        match row {
            Some(row) => Ok(Some(Self::load_associations(pool, row).await?)),
            None => Ok(None),
        }
    }

    /// Fetch a product and its associations by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM product WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to fetch product by slug")?;

        match row {
            Some(row) => Ok(Some(Self::load_associations(pool, row).await?)),
            None => Ok(None),
        }
    }

    async fn load_associations(pool: &PgPool, row: ProductRow) -> Result<Self> {
        let brand = match row.brand_id {
            Some(brand_id) => Brand::find_by_id(pool, brand_id).await?,
            None => None,
        };

        let prices = sqlx::query_as::<_, ProductPrice>(
            "SELECT currency_id, price, discount_price, available \
             FROM product_currency WHERE product_id = $1 ORDER BY currency_id",
        )
        .bind(row.id)
        .fetch_all(pool)
        .await
        .context("failed to fetch product prices")?;

        let sizes = sqlx::query_as::<_, ProductSize>(
            "SELECT s.id, s.raw_size, s.international_size, s.russian_size, ps.is_available \
             FROM product_size ps \
             INNER JOIN size s ON s.id = ps.size_id \
             WHERE ps.product_id = $1 ORDER BY s.id",
        )
        .bind(row.id)
        .fetch_all(pool)
        .await
        .context("failed to fetch product sizes")?;

        let colors = sqlx::query_as::<_, Color>(
            "SELECT DISTINCT c.id, c.name, c.code \
             FROM product_variant pv \
             INNER JOIN color c ON c.id = pv.color_id \
             WHERE pv.product_id = $1 ORDER BY c.id",
        )
        .bind(row.id)
        .fetch_all(pool)
        .await
        .context("failed to fetch product colors")?;

        let countries = sqlx::query_as::<_, Country>(
            "SELECT c.id, c.name_ru, c.name_en, c.iso_code, c.flag_url \
             FROM product_country pc \
             INNER JOIN country c ON c.id = pc.country_id \
             WHERE pc.product_id = $1 ORDER BY c.name_ru",
        )
        .bind(row.id)
        .fetch_all(pool)
        .await
        .context("failed to fetch product countries")?;

        let categories = sqlx::query_as::<_, Category>(
            "SELECT c.id, c.name_ru, c.name_en, c.slug, c.parent_id \
             FROM product_category pc \
             INNER JOIN category c ON c.id = pc.category_id \
             WHERE pc.product_id = $1 ORDER BY c.id",
        )
        .bind(row.id)
        .fetch_all(pool)
        .await
        .context("failed to fetch product categories")?;

        Ok(Self {
            id: row.id,
            article: row.article,
            title_ru: row.title_ru,
            title_en: row.title_en,
            slug: row.slug,
            available: row.available,
            rating: row.rating,
            popularity: row.popularity,
            created: row.created,
            updated: row.updated,
            brand,
            prices,
            sizes,
            colors,
            countries,
            categories,
        })
    }
}
