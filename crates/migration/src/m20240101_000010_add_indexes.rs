use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Product: lookups and counts by owning category
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_product_category")
                    .table(Product::Table)
                    .col(Product::CategoryId)
                    .to_owned(),
            )
            .await?;

        // OrderItem: product reference check before product delete
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_order_item_product")
                    .table(OrderItem::Table)
                    .col(OrderItem::ProductId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_order_item_order")
                    .table(OrderItem::Table)
                    .col(OrderItem::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_order_user")
                    .table(Order::Table)
                    .col(Order::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_product_category").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_item_product").table(OrderItem::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_item_order").table(OrderItem::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_user").table(Order::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Product { Table, CategoryId }

#[derive(DeriveIden)]
enum OrderItem { Table, OrderId, ProductId }

#[derive(DeriveIden)]
enum Order { Table, UserId }
