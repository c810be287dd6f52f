//! Integrity preconditions checked before a mutation is applied.
//!
//! Each guard reads, decides and returns `Ok` or the refusal the HTTP layer
//! should report. They are check-then-act: no locking is taken between the
//! check and the write that follows.

use models::{category, order_item, product};
use sea_orm::{
    sea_query::{Expr, Func},
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
};

use crate::errors::ServiceError;

pub const MSG_CATEGORY_NAME_TAKEN: &str = "Já existe uma categoria com este nome";
pub const MSG_CATEGORY_NAME_TAKEN_BY_OTHER: &str = "Já existe outra categoria com este nome";
pub const MSG_CATEGORY_HAS_PRODUCTS: &str = "Não é possível excluir uma categoria que possui produtos";
pub const MSG_CATEGORY_MISSING: &str = "Categoria não encontrada";
pub const MSG_PRODUCT_IN_ORDERS: &str = "Não é possível excluir um produto que está em pedidos";

pub fn category_not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Categoria com ID {id} não encontrada"))
}

pub fn product_not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Produto com ID {id} não encontrado"))
}

/// Load a category or fail with NotFound.
pub async fn find_category<C: ConnectionTrait>(db: &C, id: i32) -> Result<category::Model, ServiceError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| category_not_found(id))
}

/// Load a product or fail with NotFound.
pub async fn find_product<C: ConnectionTrait>(db: &C, id: i32) -> Result<product::Model, ServiceError> {
    product::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| product_not_found(id))
}

pub async fn category_exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ServiceError> {
    let n = category::Entity::find()
        .filter(category::Column::Id.eq(id))
        .count(db)
        .await?;
    Ok(n > 0)
}

/// Names compare case-insensitively. `except` skips the category being
/// renamed so it may keep its own name.
pub async fn ensure_category_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = category::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(category::Column::Name))).eq(name.to_lowercase()));
    if let Some(id) = except {
        query = query.filter(category::Column::Id.ne(id));
    }
    if query.count(db).await? > 0 {
        let msg = if except.is_some() { MSG_CATEGORY_NAME_TAKEN_BY_OTHER } else { MSG_CATEGORY_NAME_TAKEN };
        return Err(ServiceError::Conflict(msg.into()));
    }
    Ok(())
}

/// A product may only point at an existing category; a dangling reference
/// is a bad request rather than a missing resource.
pub async fn ensure_category_reference<C: ConnectionTrait>(db: &C, category_id: i32) -> Result<(), ServiceError> {
    if !category_exists(db, category_id).await? {
        return Err(ServiceError::Validation(MSG_CATEGORY_MISSING.into()));
    }
    Ok(())
}

pub async fn count_products_in_category<C: ConnectionTrait>(db: &C, category_id: i32) -> Result<u64, ServiceError> {
    Ok(product::Entity::find()
        .filter(product::Column::CategoryId.eq(category_id))
        .count(db)
        .await?)
}

pub async fn ensure_category_empty<C: ConnectionTrait>(db: &C, category_id: i32) -> Result<(), ServiceError> {
    if count_products_in_category(db, category_id).await? > 0 {
        return Err(ServiceError::Conflict(MSG_CATEGORY_HAS_PRODUCTS.into()));
    }
    Ok(())
}

pub async fn ensure_product_not_ordered<C: ConnectionTrait>(db: &C, product_id: i32) -> Result<(), ServiceError> {
    let n = order_item::Entity::find()
        .filter(order_item::Column::ProductId.eq(product_id))
        .count(db)
        .await?;
    if n > 0 {
        return Err(ServiceError::Conflict(MSG_PRODUCT_IN_ORDERS.into()));
    }
    Ok(())
}
