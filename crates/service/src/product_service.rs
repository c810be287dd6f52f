use models::{category, product};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tracing::{debug, info, instrument};

use crate::dto::{ProductDto, ProductFilter, ProductInput};
use crate::errors::ServiceError;
use crate::guards;
use crate::pagination::{Page, PageRequest};

/// Escape LIKE wildcards so the search text matches literally.
fn like_pattern(search: &str) -> String {
    let mut out = String::with_capacity(search.len() + 2);
    out.push('%');
    for ch in search.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

impl ProductFilter {
    /// AND of the active filters. Columns are table-qualified because the
    /// listing query joins `category`, which has its own name/description.
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(search);
            let lowered = |col: product::Column| {
                Expr::expr(Func::lower(Expr::col((product::Entity, col))))
                    .like(LikeExpr::new(pattern.clone()).escape('\\'))
            };
            cond = cond.add(
                Condition::any()
                    .add(lowered(product::Column::Name))
                    .add(lowered(product::Column::Description)),
            );
        }
        if let Some(min) = self.min_price {
            cond = cond.add(product::Column::Price.gte(min));
        }
        if let Some(max) = self.max_price {
            cond = cond.add(product::Column::Price.lte(max));
        }
        cond
    }
}

/// Filter, count, then slice ordered by id.
pub async fn list_products(
    db: &DatabaseConnection,
    filter: &ProductFilter,
    page: PageRequest,
) -> Result<Page<ProductDto>, ServiceError> {
    let page = page.normalize();
    let total_items = product::Entity::find()
        .filter(filter.condition())
        .count(db)
        .await?;
    let items = product::Entity::find()
        .filter(filter.condition())
        .find_also_related(category::Entity)
        .order_by_asc(product::Column::Id)
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await?
        .into_iter()
        .map(ProductDto::from_pair)
        .collect::<Vec<_>>();
    debug!(total_items, returned = items.len(), page = page.page, page_size = page.page_size, "products_listed");
    Ok(Page::new(page, total_items, items))
}

pub async fn get_product(db: &DatabaseConnection, id: i32) -> Result<ProductDto, ServiceError> {
    product::Entity::find_by_id(id)
        .find_also_related(category::Entity)
        .one(db)
        .await?
        .map(ProductDto::from_pair)
        .ok_or_else(|| guards::product_not_found(id))
}

pub async fn get_products_by_category(db: &DatabaseConnection, category_id: i32) -> Result<Vec<ProductDto>, ServiceError> {
    let Some(c) = category::Entity::find_by_id(category_id).one(db).await? else {
        return Err(ServiceError::NotFound(guards::MSG_CATEGORY_MISSING.into()));
    };
    let rows = product::Entity::find()
        .filter(product::Column::CategoryId.eq(category_id))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|p| ProductDto::from_model(p, c.name.clone())).collect())
}

#[instrument(skip(db, input), fields(name = %input.name, category_id = input.category_id))]
pub async fn create_product(db: &DatabaseConnection, input: &ProductInput) -> Result<ProductDto, ServiceError> {
    let fields = input.fields();
    fields.validate()?;
    guards::ensure_category_reference(db, fields.category_id).await?;

    let created = product::create(db, &fields).await?;
    info!(id = created.id, "product_created");
    get_product(db, created.id).await
}

#[instrument(skip(db, input), fields(category_id = input.category_id))]
pub async fn update_product(db: &DatabaseConnection, id: i32, input: &ProductInput) -> Result<(), ServiceError> {
    let fields = input.fields();
    fields.validate()?;
    let existing = guards::find_product(db, id).await?;
    guards::ensure_category_reference(db, fields.category_id).await?;

    product::overwrite(db, existing, &fields).await?;
    info!(id, "product_updated");
    Ok(())
}

#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    guards::find_product(db, id).await?;
    guards::ensure_product_not_ordered(db, id).await?;

    product::Entity::delete_by_id(id).exec(db).await?;
    info!(id, "product_deleted");
    Ok(())
}
