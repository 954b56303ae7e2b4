//! Table and column identifiers for query generation.
//!
//! One `Iden` enum per relation; `Table` renders the snake_case enum name.

use sea_query::Iden;

#[derive(Clone, Copy, Iden)]
pub enum Product {
    Table,
    Id,
    Article,
    TitleRu,
    TitleEn,
    Slug,
    Available,
    Rating,
    Popularity,
    Created,
    Updated,
    BrandId,
}

#[derive(Clone, Copy, Iden)]
pub enum Brand {
    Table,
    Id,
    Name,
    ImageUrl,
}

#[derive(Clone, Copy, Iden)]
pub enum Category {
    Table,
    Id,
    NameRu,
    NameEn,
    Slug,
    ParentId,
}

#[derive(Clone, Copy, Iden)]
pub enum ProductCategory {
    Table,
    ProductId,
    CategoryId,
}

#[derive(Clone, Copy, Iden)]
pub enum Size {
    Table,
    Id,
    RawSize,
    InternationalSize,
    RussianSize,
    UsSize,
    EuSize,
    UkSize,
    JpSize,
}

#[derive(Clone, Copy, Iden)]
pub enum ProductSize {
    Table,
    ProductId,
    SizeId,
    IsAvailable,
}

#[derive(Clone, Copy, Iden)]
pub enum Color {
    Table,
    Id,
    Name,
    Code,
}

#[derive(Clone, Copy, Iden)]
pub enum ProductVariant {
    Table,
    Id,
    ProductId,
    ColorId,
    Attributes,
    IsAvailable,
}

#[derive(Clone, Copy, Iden)]
pub enum Country {
    Table,
    Id,
    NameRu,
    NameEn,
    IsoCode,
    FlagUrl,
}

#[derive(Clone, Copy, Iden)]
pub enum ProductCountry {
    Table,
    ProductId,
    CountryId,
}

#[derive(Clone, Copy, Iden)]
pub enum Currency {
    Table,
    Id,
    Name,
    Symbol,
    Code,
}

#[derive(Clone, Copy, Iden)]
pub enum ProductCurrency {
    Table,
    ProductId,
    CurrencyId,
    Price,
    DiscountPrice,
    Available,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_query::{Expr, ExprTrait, PostgresQueryBuilder, Query};

    #[test]
    fn idents_render_snake_case() {
        let sql = Query::select()
            .column((Product::Table, Product::TitleRu))
            .from(Product::Table)
            .and_where(Expr::col((Product::Table, Product::BrandId)).eq(1))
            .to_string(PostgresQueryBuilder);

        assert!(sql.contains("\"product\".\"title_ru\""));
        assert!(sql.contains("\"product\".\"brand_id\""));
    }
}
