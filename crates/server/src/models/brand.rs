//! Brand model.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::PgPool;

use crate::catalog::predicate::contains_pattern;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
}

impl Brand {
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let brand =
            sqlx::query_as::<_, Self>("SELECT id, name, image_url FROM brand WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await
                .context("failed to fetch brand")?;

        Ok(brand)
    }

    /// One page of brands ordered by name, optionally filtered by a name
    /// substring.
    pub async fn list_page(
        pool: &PgPool,
        name_filter: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Self>> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);
        let brands = match name_filter {
            Some(name) => {
                sqlx::query_as::<_, Self>(
                    "SELECT id, name, image_url FROM brand WHERE name ILIKE $1 \
                     ORDER BY name LIMIT $2 OFFSET $3",
                )
                .bind(contains_pattern(name))
                .bind(i64::from(per_page))
                .bind(offset)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Self>(
                    "SELECT id, name, image_url FROM brand ORDER BY name LIMIT $1 OFFSET $2",
                )
                .bind(i64::from(per_page))
                .bind(offset)
                .fetch_all(pool)
                .await
            }
        }
        .context("failed to list brands")?;

        Ok(brands)
    }

    /// Total brand count under the same optional name filter.
    pub async fn count(pool: &PgPool, name_filter: Option<&str>) -> Result<i64> {
        let total: i64 = match name_filter {
            Some(name) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM brand WHERE name ILIKE $1")
                    .bind(contains_pattern(name))
                    .fetch_one(pool)
                    .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM brand")
                    .fetch_one(pool)
                    .await
            }
        }
        .context("failed to count brands")?;

        Ok(total)
    }
}
