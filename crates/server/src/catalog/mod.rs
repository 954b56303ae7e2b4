//! Faceted product catalog: filtering, aggregation, listing assembly.

pub mod aggregates;
pub mod category_scope;
pub mod filters;
pub mod pagination;
pub mod params;
pub mod predicate;
pub mod query_builder;
pub mod schema;
pub mod service;

pub use aggregates::FacetService;
pub use category_scope::{CategoryScope, CategoryService};
pub use pagination::{PagePolicy, Paged};
pub use params::{ListingParams, SortKey};
pub use predicate::Predicate;
pub use service::{CatalogService, ProductPage};
