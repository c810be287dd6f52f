use std::collections::HashMap;

use models::{category, product};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::{info, instrument};

use crate::dto::{CategoryDto, CategoryInput, CategoryWithProductsDto, ProductDto};
use crate::errors::ServiceError;
use crate::guards;

/// Product counts keyed by category id, one grouped query.
async fn product_counts(db: &DatabaseConnection) -> Result<HashMap<i32, u64>, ServiceError> {
    let rows: Vec<(i32, i64)> = product::Entity::find()
        .select_only()
        .column(product::Column::CategoryId)
        .column_as(product::Column::Id.count(), "product_count")
        .group_by(product::Column::CategoryId)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|(id, n)| (id, n.max(0) as u64)).collect())
}

/// List every category ordered by id, each with its current product count.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<CategoryDto>, ServiceError> {
    let rows = category::Entity::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?;
    let counts = product_counts(db).await?;
    Ok(rows
        .into_iter()
        .map(|c| {
            let n = counts.get(&c.id).copied().unwrap_or(0);
            CategoryDto::from_model(c, n)
        })
        .collect())
}

pub async fn get_category(db: &DatabaseConnection, id: i32) -> Result<CategoryDto, ServiceError> {
    let c = guards::find_category(db, id).await?;
    let n = guards::count_products_in_category(db, id).await?;
    Ok(CategoryDto::from_model(c, n))
}

/// Category plus all of its products, each carrying the category name.
pub async fn get_category_with_products(db: &DatabaseConnection, id: i32) -> Result<CategoryWithProductsDto, ServiceError> {
    let c = guards::find_category(db, id).await?;
    let products = product::Entity::find()
        .filter(product::Column::CategoryId.eq(id))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|p| ProductDto::from_model(p, c.name.clone()))
        .collect();
    Ok(CategoryWithProductsDto {
        id: c.id,
        name: c.name,
        description: c.description,
        created_at: c.created_at,
        products,
    })
}

#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_category(db: &DatabaseConnection, input: &CategoryInput) -> Result<CategoryDto, ServiceError> {
    category::validate_name(&input.name)?;
    category::validate_description(&input.description)?;
    guards::ensure_category_name_free(db, &input.name, None).await?;

    let created = category::create(db, &input.name, &input.description).await?;
    info!(id = created.id, "category_created");
    Ok(CategoryDto::from_model(created, 0))
}

#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn update_category(db: &DatabaseConnection, id: i32, input: &CategoryInput) -> Result<(), ServiceError> {
    category::validate_name(&input.name)?;
    category::validate_description(&input.description)?;
    let existing = guards::find_category(db, id).await?;
    guards::ensure_category_name_free(db, &input.name, Some(id)).await?;

    category::rename(db, existing, &input.name, &input.description).await?;
    info!(id, "category_updated");
    Ok(())
}

#[instrument(skip(db))]
pub async fn delete_category(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    guards::find_category(db, id).await?;
    guards::ensure_category_empty(db, id).await?;

    category::Entity::delete_by_id(id).exec(db).await?;
    info!(id, "category_deleted");
    Ok(())
}
