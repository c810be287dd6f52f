//! Create `order_item` table with FKs to `order` and `product`.
//!
//! The product FK restricts deletes: an ordered product must stay.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderItem::Table)
                    .if_not_exists()
                    .col(pk_auto(OrderItem::Id))
                    .col(integer(OrderItem::Quantity).not_null())
                    .col(decimal_len(OrderItem::UnitPrice, 12, 2).not_null())
                    .col(decimal_len(OrderItem::Subtotal, 14, 2).not_null())
                    .col(integer(OrderItem::OrderId).not_null())
                    .col(integer(OrderItem::ProductId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_item_order")
                            .from(OrderItem::Table, OrderItem::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_item_product")
                            .from(OrderItem::Table, OrderItem::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OrderItem::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OrderItem { Table, Id, Quantity, UnitPrice, Subtotal, OrderId, ProductId }

#[derive(DeriveIden)]
enum Order { Table, Id }

#[derive(DeriveIden)]
enum Product { Table, Id }
