//! Manufacturing country model.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Country {
    pub id: i64,
    pub name_ru: String,
    pub name_en: Option<String>,
    pub iso_code: Option<String>,
    pub flag_url: Option<String>,
}

const COLUMNS: &str = "id, name_ru, name_en, iso_code, flag_url";

impl Country {
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let country =
            sqlx::query_as::<_, Self>(&format!("SELECT {COLUMNS} FROM country WHERE id = $1"))
                .bind(id)
                .fetch_optional(pool)
                .await
                .context("failed to fetch country")?;

        Ok(country)
    }

    pub async fn list_page(pool: &PgPool, page: u32, per_page: u32) -> Result<Vec<Self>> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);
        let countries = sqlx::query_as::<_, Self>(&format!(
            "SELECT {COLUMNS} FROM country ORDER BY name_ru LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("failed to list countries")?;

        Ok(countries)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM country")
            .fetch_one(pool)
            .await
            .context("failed to count countries")?;

        Ok(total)
    }
}
