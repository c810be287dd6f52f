//! Create `payment` table with FK to `order`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(pk_auto(Payment::Id))
                    .col(integer(Payment::OrderId).not_null())
                    .col(string_len(Payment::Method, 16).not_null())
                    .col(decimal_len(Payment::Amount, 14, 2).not_null())
                    .col(boolean(Payment::Status).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_order")
                            .from(Payment::Table, Payment::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Payment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Payment { Table, Id, OrderId, Method, Amount, Status }

#[derive(DeriveIden)]
enum Order { Table, Id }
