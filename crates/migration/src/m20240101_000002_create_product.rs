//! Create `product` table with FK to `category`.
//!
//! Deleting a category that still owns products is refused by the FK as well
//! as by the service layer.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string_len(Product::Name, 100).not_null())
                    .col(string_len(Product::Description, 500).not_null())
                    .col(decimal_len(Product::Price, 12, 2).not_null())
                    .col(integer(Product::Stock).not_null())
                    .col(string_len(Product::ImageUrl, 2048).not_null())
                    .col(timestamp_with_time_zone(Product::CreatedAt).not_null())
                    .col(integer(Product::CategoryId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_category")
                            .from(Product::Table, Product::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product { Table, Id, Name, Description, Price, Stock, ImageUrl, CreatedAt, CategoryId }

#[derive(DeriveIden)]
enum Category { Table, Id }
