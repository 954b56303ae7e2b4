//! Size model: one row per raw size with its regional equivalents.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Size {
    pub id: i64,
    pub raw_size: String,
    pub international_size: Option<String>,
    pub russian_size: Option<String>,
    pub us_size: Option<String>,
    pub eu_size: Option<String>,
    pub uk_size: Option<String>,
    pub jp_size: Option<String>,
}

const COLUMNS: &str =
    "id, raw_size, international_size, russian_size, us_size, eu_size, uk_size, jp_size";

impl Size {
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let size = sqlx::query_as::<_, Self>(&format!("SELECT {COLUMNS} FROM size WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("failed to fetch size")?;

        Ok(size)
    }

    pub async fn list_page(pool: &PgPool, page: u32, per_page: u32) -> Result<Vec<Self>> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);
        let sizes = sqlx::query_as::<_, Self>(&format!(
            "SELECT {COLUMNS} FROM size ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("failed to list sizes")?;

        Ok(sizes)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM size")
            .fetch_one(pool)
            .await
            .context("failed to count sizes")?;

        Ok(total)
    }
}
