//! Category hierarchy resolution for listing scope.

use std::sync::Arc;

use anyhow::{Context, Result};
use dashmap::DashMap;
use sqlx::PgPool;

/// Depth cap for hierarchy traversal, guards against cycles in parent links.
const MAX_TREE_DEPTH: i32 = 100;

/// The category restriction a listing request runs under.
#[derive(Debug, Clone)]
pub enum CategoryScope {
    /// No category parameter was supplied.
    Unscoped,

    /// Restrict to these category ids (the requested category plus all of
    /// its descendants).
    Within(Arc<Vec<i64>>),

    /// The requested category does not exist.
    Missing,
}

/// Resolves category ids and slugs into descendant closures, with a
/// process-wide cache of closures keyed by category id.
pub struct CategoryService {
    pool: PgPool,
    descendants: DashMap<i64, Arc<Vec<i64>>>,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            descendants: DashMap::new(),
        }
    }

    /// Resolve a listing's category parameters into a scope. The slug is
    /// only consulted when no id is given.
    pub async fn resolve_scope(
        &self,
        category_id: Option<i64>,
        category_slug: Option<&str>,
    ) -> Result<CategoryScope> {
        let id = match (category_id, category_slug) {
            (Some(id), _) => Some(id),
            (None, Some(slug)) => self.id_for_slug(slug).await?,
            (None, None) => return Ok(CategoryScope::Unscoped),
        };

        let Some(id) = id else {
            return Ok(CategoryScope::Missing);
        };

        match self.descendants_including_self(id).await? {
            Some(ids) => Ok(CategoryScope::Within(ids)),
            None => Ok(CategoryScope::Missing),
        }
    }

    /// Ids of a category and every descendant, or `None` if the category
    /// does not exist. Cached per category id.
    pub async fn descendants_including_self(&self, id: i64) -> Result<Option<Arc<Vec<i64>>>> {
        if let Some(cached) = self.descendants.get(&id) {
            return Ok(Some(Arc::clone(&cached)));
        }

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM category WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .context("failed to look up category")?;
        if exists.is_none() {
            return Ok(None);
        }

        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            WITH RECURSIVE descendants AS (
                -- Base case: the category itself
                SELECT id, 0 AS depth
                FROM category
                WHERE id = $1

                UNION ALL

                -- Recursive case: children
                SELECT c.id, d.depth + 1
                FROM category c
                INNER JOIN descendants d ON c.parent_id = d.id
                WHERE d.depth < $2
            )
            SELECT id FROM descendants
            "#,
        )
        .bind(id)
        .bind(MAX_TREE_DEPTH)
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch category descendants")?;

        let ids = Arc::new(ids);
        self.descendants.insert(id, Arc::clone(&ids));
        Ok(Some(ids))
    }

    /// Look up a category id by slug.
    pub async fn id_for_slug(&self, slug: &str) -> Result<Option<i64>> {
        let id = sqlx::query_scalar("SELECT id FROM category WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("failed to look up category by slug")?;
        Ok(id)
    }
}
