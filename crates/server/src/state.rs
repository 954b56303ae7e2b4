//! Shared application state.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::catalog::{CatalogService, CategoryService, FacetService, PagePolicy};
use crate::config::Config;
use crate::db;

/// Application state shared across all request handlers. Cheap to clone;
/// everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// Category hierarchy resolution with its closure cache.
    categories: Arc<CategoryService>,

    /// Listing coordination.
    catalog: CatalogService,

    /// Page-size bounds from config.
    page_policy: PagePolicy,
}

impl AppState {
    /// Create application state from configuration.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&db)
            .await
            .context("failed to run migrations")?;

        Ok(Self::with_pool(db, config))
    }

    /// Build state around an existing pool. Used by tests that supply a
    /// lazily-connecting pool.
    pub fn with_pool(db: PgPool, config: &Config) -> Self {
        let page_policy = PagePolicy::new(config.default_page_size, config.max_page_size);
        let categories = Arc::new(CategoryService::new(db.clone()));
        let catalog = CatalogService::new(db.clone(), Arc::clone(&categories), page_policy);

        Self {
            inner: Arc::new(AppStateInner {
                db,
                categories,
                catalog,
                page_policy,
            }),
        }
    }

    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub fn categories(&self) -> &CategoryService {
        &self.inner.categories
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    pub fn facets(&self) -> &FacetService {
        self.inner.catalog.facets()
    }

    pub fn page_policy(&self) -> PagePolicy {
        self.inner.page_policy
    }
}
