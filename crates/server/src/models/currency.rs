//! Currency model.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Currency {
    pub id: i64,
    pub name: String,
    pub symbol: Option<String>,
    pub code: Option<String>,
}

impl Currency {
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let currency = sqlx::query_as::<_, Self>(
            "SELECT id, name, symbol, code FROM currency WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch currency")?;

        Ok(currency)
    }

    pub async fn list_page(pool: &PgPool, page: u32, per_page: u32) -> Result<Vec<Self>> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);
        let currencies = sqlx::query_as::<_, Self>(
            "SELECT id, name, symbol, code FROM currency ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("failed to list currencies")?;

        Ok(currencies)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM currency")
            .fetch_one(pool)
            .await
            .context("failed to count currencies")?;

        Ok(total)
    }
}
