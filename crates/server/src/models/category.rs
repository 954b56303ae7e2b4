//! Category model: a single-parent tree addressed by id or slug.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name_ru: String,
    pub name_en: Option<String>,
    pub slug: Option<String>,
    pub parent_id: Option<i64>,
}

const COLUMNS: &str = "id, name_ru, name_en, slug, parent_id";

impl Category {
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let category = sqlx::query_as::<_, Self>(&format!(
            "SELECT {COLUMNS} FROM category WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch category")?;

        Ok(category)
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let category = sqlx::query_as::<_, Self>(&format!(
            "SELECT {COLUMNS} FROM category WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to fetch category by slug")?;

        Ok(category)
    }

    /// One page of top-level categories ordered by Russian name.
    pub async fn list_roots(pool: &PgPool, page: u32, per_page: u32) -> Result<Vec<Self>> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);
        let categories = sqlx::query_as::<_, Self>(&format!(
            "SELECT {COLUMNS} FROM category WHERE parent_id IS NULL \
             ORDER BY name_ru LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("failed to list root categories")?;

        Ok(categories)
    }

    /// Total number of top-level categories.
    pub async fn count_roots(pool: &PgPool) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category WHERE parent_id IS NULL")
            .fetch_one(pool)
            .await
            .context("failed to count root categories")?;

        Ok(total)
    }

    /// List the direct children of a category.
    pub async fn children(pool: &PgPool, parent_id: i64) -> Result<Vec<Self>> {
        let categories = sqlx::query_as::<_, Self>(&format!(
            "SELECT {COLUMNS} FROM category WHERE parent_id = $1 ORDER BY name_ru"
        ))
        .bind(parent_id)
        .fetch_all(pool)
        .await
        .context("failed to list category children")?;

        Ok(categories)
    }
}
