use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, product};

pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Product }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Product => Entity::has_many(product::Entity).into(),
        }
    }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::validation("O nome é obrigatório"));
    }
    let len = name.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(errors::ModelError::validation("O nome deve ter entre 3 e 50 caracteres"));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), errors::ModelError> {
    if description.trim().is_empty() {
        return Err(errors::ModelError::validation("A descrição é obrigatória"));
    }
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(errors::ModelError::validation("A descrição deve ter no máximo 200 caracteres"));
    }
    Ok(())
}

/// Insert a category stamped with the current UTC time.
pub async fn create<C: ConnectionTrait>(db: &C, name: &str, description: &str) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_description(description)?;
    let am = ActiveModel {
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Overwrite name and description; `created_at` is never touched.
pub async fn rename<C: ConnectionTrait>(db: &C, existing: Model, name: &str, description: &str) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_description(description)?;
    let mut am: ActiveModel = existing.into();
    am.name = Set(name.to_string());
    am.description = Set(description.to_string());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
