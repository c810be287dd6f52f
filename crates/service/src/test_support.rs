#![cfg(test)]
use chrono::Utc;
use migration::MigratorTrait;
use models::{db::connect_with_config, order, order_item, product, user};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tempfile::TempDir;

/// Fresh migrated SQLite database in its own temp dir. Hold on to the
/// `TempDir` for as long as the connection is used.
pub async fn get_db() -> Result<(TempDir, DatabaseConnection), anyhow::Error> {
    let dir = tempfile::tempdir()?;
    let cfg = configs::DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.path().join("service.db").display()),
        max_connections: 4,
        ..configs::DatabaseConfig::default()
    };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok((dir, db))
}

pub async fn seeded_db() -> Result<(TempDir, DatabaseConnection), anyhow::Error> {
    let (dir, db) = get_db().await?;
    crate::seed::initialize(&db).await?;
    Ok((dir, db))
}

/// Place a one-line order for `product_id`, creating a buyer on the fly.
pub async fn insert_order_for(db: &DatabaseConnection, product_id: i32) -> Result<order_item::Model, anyhow::Error> {
    let p = product::Entity::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("product {product_id} missing"))?;
    let buyer = user::create(db, "Comprador", &format!("buyer{product_id}@exemplo.com"), "x", "").await?;
    let o = order::ActiveModel {
        order_date: Set(Utc::now().into()),
        status: Set(order::OrderStatus::Pending),
        total_amount: Set(p.price),
        user_id: Set(buyer.id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    let item = order_item::ActiveModel {
        quantity: Set(1),
        unit_price: Set(p.price),
        subtotal: Set(p.price),
        order_id: Set(o.id),
        product_id: Set(p.id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(item)
}
