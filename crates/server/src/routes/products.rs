use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use service::{
    dto::{ProductDto, ProductFilter, ProductInput},
    pagination::{PageRequest, ProductPage},
    product_service,
};
use tracing::info;

use crate::{
    errors::ApiError,
    extract::{AppJson, AppPath, AppQuery},
    state::AppState,
};

/// Query string of `GET /api/products`. Every parameter is optional.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring of name or description.
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<f64>)]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<f64>)]
    pub max_price: Option<Decimal>,
    /// Defaults to 1 when absent or not positive.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
    /// Defaults to 10 when absent or not positive.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page_size: Option<i64>,
}

/// `?minPrice=` (as sent by HTML forms) means the bound is absent.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

impl ListQuery {
    fn split(self) -> (ProductFilter, PageRequest) {
        (
            ProductFilter { search: self.search, min_price: self.min_price, max_price: self.max_price },
            PageRequest::new(self.page, self.page_size),
        )
    }
}

#[utoipa::path(
    get, path = "/api/products", tag = "products",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of matching products", body = ProductPage),
        (status = 500, description = "Unexpected failure")
    )
)]
pub async fn list(State(state): State<AppState>, AppQuery(q): AppQuery<ListQuery>) -> Result<Json<ProductPage>, ApiError> {
    let (filter, page) = q.split();
    let page = product_service::list_products(&state.db, &filter, page).await?;
    info!(total_items = page.total_items, page = page.page, "list products");
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "OK", body = ProductDto),
        (status = 404, description = "Not Found", body = crate::openapi::MessageResponse)
    )
)]
pub async fn get(State(state): State<AppState>, AppPath(id): AppPath<i32>) -> Result<Json<ProductDto>, ApiError> {
    Ok(Json(product_service::get_product(&state.db, id).await?))
}

#[utoipa::path(
    get, path = "/api/products/category/{categoryId}", tag = "products",
    params(("categoryId" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Products of the category", body = [ProductDto]),
        (status = 404, description = "Category not found", body = crate::openapi::MessageResponse)
    )
)]
pub async fn by_category(
    State(state): State<AppState>,
    AppPath(category_id): AppPath<i32>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    Ok(Json(product_service::get_products_by_category(&state.db, category_id).await?))
}

#[utoipa::path(
    post, path = "/api/products", tag = "products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Created", body = ProductDto),
        (status = 400, description = "Unknown category or invalid fields", body = crate::openapi::MessageResponse)
    )
)]
pub async fn create(State(state): State<AppState>, AppJson(input): AppJson<ProductInput>) -> Result<Response, ApiError> {
    let created = product_service::create_product(&state.db, &input).await?;
    info!(id = created.id, category_id = created.category_id, "created product");
    let location = format!("/api/products/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)).into_response())
}

#[utoipa::path(
    put, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductInput,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Unknown category or invalid fields", body = crate::openapi::MessageResponse),
        (status = 404, description = "Not Found", body = crate::openapi::MessageResponse)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<ProductInput>,
) -> Result<StatusCode, ApiError> {
    product_service::update_product(&state.db, id, &input).await?;
    info!(id, "updated product");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Product referenced by an order", body = crate::openapi::MessageResponse),
        (status = 404, description = "Not Found", body = crate::openapi::MessageResponse)
    )
)]
pub async fn delete(State(state): State<AppState>, AppPath(id): AppPath<i32>) -> Result<StatusCode, ApiError> {
    product_service::delete_product(&state.db, id).await?;
    info!(id, "deleted product");
    Ok(StatusCode::NO_CONTENT)
}
