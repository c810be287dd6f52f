//! Raw entity dumps with their relations attached, for inspecting the store.

use models::{category, product};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::Serialize;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTree {
    #[serde(flatten)]
    pub category: category::Model,
    pub products: Vec<product::Model>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTree {
    #[serde(flatten)]
    pub product: product::Model,
    pub category: Option<category::Model>,
}

pub async fn categories_with_products(db: &DatabaseConnection) -> Result<Vec<CategoryTree>, ServiceError> {
    let rows = category::Entity::find()
        .find_with_related(product::Entity)
        .order_by_asc(category::Column::Id)
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|(category, products)| CategoryTree { category, products }).collect())
}

pub async fn products_with_category(db: &DatabaseConnection) -> Result<Vec<ProductTree>, ServiceError> {
    let rows = product::Entity::find()
        .find_also_related(category::Entity)
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|(product, category)| ProductTree { product, category }).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seeded_db;

    #[tokio::test]
    async fn trees_cover_the_whole_catalog() -> anyhow::Result<()> {
        let (_dir, db) = seeded_db().await?;
        let cats = categories_with_products(&db).await?;
        assert_eq!(cats.len(), 4);
        assert_eq!(cats.iter().map(|c| c.products.len()).sum::<usize>(), 9);

        let products = products_with_category(&db).await?;
        assert_eq!(products.len(), 9);
        assert!(products.iter().all(|p| p.category.as_ref().map(|c| c.id) == Some(p.product.category_id)));

        let json = serde_json::to_value(&cats[0])?;
        assert_eq!(json["name"], "Eletrônicos");
        assert!(json["products"].is_array());
        Ok(())
    }
}
