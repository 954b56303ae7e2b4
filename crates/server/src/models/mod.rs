//! Database row models and their queries.

pub mod brand;
pub mod category;
pub mod color;
pub mod country;
pub mod currency;
pub mod product;
pub mod size;
