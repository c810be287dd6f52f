//! Transfer records crossing the service boundary. Field names are camelCase
//! on the wire.

use models::{category, product};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    /// Products owned at query time; computed, not stored.
    pub product_count: u64,
}

impl CategoryDto {
    pub fn from_model(m: category::Model, product_count: u64) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
            product_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithProductsDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    pub products: Vec<ProductDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub stock: i32,
    pub image_url: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    pub category_id: i32,
    /// Read-side projection of the owning category's name.
    pub category_name: String,
}

impl ProductDto {
    pub fn from_model(m: product::Model, category_name: impl Into<String>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            stock: m.stock,
            image_url: m.image_url,
            created_at: m.created_at,
            category_id: m.category_id,
            category_name: category_name.into(),
        }
    }

    /// Shape a `find_also_related` row; a dangling category yields an empty name.
    pub fn from_pair((p, c): (product::Model, Option<category::Model>)) -> Self {
        let name = c.map(|c| c.name).unwrap_or_default();
        Self::from_model(p, name)
    }
}

/// Body of `POST /categories` and `PUT /categories/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub category_id: i32,
}

impl ProductInput {
    pub fn fields(&self) -> product::ProductFields<'_> {
        product::ProductFields {
            name: &self.name,
            description: &self.description,
            price: self.price,
            stock: self.stock,
            image_url: &self.image_url,
            category_id: self.category_id,
        }
    }
}

/// Optional filters for product listing, combined with AND.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}
