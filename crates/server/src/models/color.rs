//! Color model.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Color {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
}

impl Color {
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let color = sqlx::query_as::<_, Self>("SELECT id, name, code FROM color WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("failed to fetch color")?;

        Ok(color)
    }

    pub async fn list_page(pool: &PgPool, page: u32, per_page: u32) -> Result<Vec<Self>> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);
        let colors = sqlx::query_as::<_, Self>(
            "SELECT id, name, code FROM color ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("failed to list colors")?;

        Ok(colors)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM color")
            .fetch_one(pool)
            .await
            .context("failed to count colors")?;

        Ok(total)
    }
}
