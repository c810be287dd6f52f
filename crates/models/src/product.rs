use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::{category, errors, order_item};

pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const PRICE_MIN: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
pub const PRICE_MAX: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub stock: i32,
    pub image_url: String,
    pub created_at: DateTimeWithTimeZone,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Category, OrderItem }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::CategoryId)
                .to(category::Column::Id)
                .into(),
            Relation::OrderItem => Entity::has_many(order_item::Entity).into(),
        }
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl Related<order_item::Entity> for Entity {
    fn to() -> RelationDef { Relation::OrderItem.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Mutable product fields as supplied by a create or update request.
#[derive(Clone, Debug)]
pub struct ProductFields<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: &'a str,
    pub category_id: i32,
}

impl ProductFields<'_> {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        validate_name(self.name)?;
        validate_description(self.description)?;
        validate_price(self.price)?;
        validate_stock(self.stock)?;
        validate_image_url(self.image_url)?;
        Ok(())
    }
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::validation("O nome é obrigatório"));
    }
    let len = name.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(errors::ModelError::validation("O nome deve ter entre 3 e 100 caracteres"));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), errors::ModelError> {
    if description.trim().is_empty() {
        return Err(errors::ModelError::validation("A descrição é obrigatória"));
    }
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(errors::ModelError::validation("A descrição deve ter no máximo 500 caracteres"));
    }
    Ok(())
}

pub fn validate_price(price: Decimal) -> Result<(), errors::ModelError> {
    if price < PRICE_MIN || price > PRICE_MAX {
        return Err(errors::ModelError::validation("O preço deve estar entre 0.01 e 1.000.000"));
    }
    Ok(())
}

pub fn validate_stock(stock: i32) -> Result<(), errors::ModelError> {
    if stock < 0 {
        return Err(errors::ModelError::validation("O estoque não pode ser negativo"));
    }
    Ok(())
}

/// Empty, or an absolute http/https/ftp URL with a host part and no whitespace.
pub fn validate_image_url(url: &str) -> Result<(), errors::ModelError> {
    if url.is_empty() {
        return Ok(());
    }
    let lower = url.to_ascii_lowercase();
    let rest = ["http://", "https://", "ftp://"]
        .iter()
        .find_map(|scheme| lower.strip_prefix(scheme));
    match rest {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') && !url.chars().any(char::is_whitespace) => Ok(()),
        _ => Err(errors::ModelError::validation("URL da imagem inválida")),
    }
}

/// Insert a product stamped with the current UTC time. The caller is
/// responsible for checking that the category exists.
pub async fn create<C: ConnectionTrait>(db: &C, fields: &ProductFields<'_>) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let am = ActiveModel {
        name: Set(fields.name.to_string()),
        description: Set(fields.description.to_string()),
        price: Set(fields.price),
        stock: Set(fields.stock),
        image_url: Set(fields.image_url.to_string()),
        created_at: Set(Utc::now().into()),
        category_id: Set(fields.category_id),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Overwrite every mutable field; `created_at` is never touched.
pub async fn overwrite<C: ConnectionTrait>(db: &C, existing: Model, fields: &ProductFields<'_>) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let mut am: ActiveModel = existing.into();
    am.name = Set(fields.name.to_string());
    am.description = Set(fields.description.to_string());
    am.price = Set(fields.price);
    am.stock = Set(fields.stock);
    am.image_url = Set(fields.image_url.to_string());
    am.category_id = Set(fields.category_id);
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
