use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, order};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Order }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Order => Entity::has_many(order::Entity).into() }
    }
}

impl Related<order::Entity> for Entity {
    fn to() -> RelationDef { Relation::Order.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid { return Err(errors::ModelError::validation("invalid email")); }
    Ok(())
}

/// Insert a user; `password_hash` must already be a hashed credential.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    email: &str,
    password_hash: &str,
    phone: &str,
) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::validation("name required")); }
    validate_email(email)?;
    let am = ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        phone: Set(phone.to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(validate_email("joao@exemplo.com").is_ok());
        assert!(validate_email("joao.exemplo.com").is_err());
        assert!(validate_email("@exemplo.com").is_err());
        assert!(validate_email("joao@localhost").is_err());
    }
}
