use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use service::{
    category_service,
    dto::{CategoryDto, CategoryInput, CategoryWithProductsDto},
};
use tracing::info;

use crate::{
    errors::ApiError,
    extract::{AppJson, AppPath},
    state::AppState,
};

#[utoipa::path(
    get, path = "/api/categories", tag = "categories",
    responses(
        (status = 200, description = "Categories ordered by id", body = [CategoryDto]),
        (status = 500, description = "Unexpected failure")
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    let list = category_service::list_categories(&state.db).await?;
    info!(count = list.len(), "list categories");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/api/categories/{id}", tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "OK", body = CategoryDto),
        (status = 404, description = "Not Found", body = crate::openapi::MessageResponse)
    )
)]
pub async fn get(State(state): State<AppState>, AppPath(id): AppPath<i32>) -> Result<Json<CategoryDto>, ApiError> {
    Ok(Json(category_service::get_category(&state.db, id).await?))
}

#[utoipa::path(
    get, path = "/api/categories/{id}/products", tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category with its products", body = CategoryWithProductsDto),
        (status = 404, description = "Not Found", body = crate::openapi::MessageResponse)
    )
)]
pub async fn get_with_products(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<CategoryWithProductsDto>, ApiError> {
    Ok(Json(category_service::get_category_with_products(&state.db, id).await?))
}

#[utoipa::path(
    post, path = "/api/categories", tag = "categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Created", body = CategoryDto),
        (status = 400, description = "Duplicate name or invalid fields", body = crate::openapi::MessageResponse)
    )
)]
pub async fn create(State(state): State<AppState>, AppJson(input): AppJson<CategoryInput>) -> Result<Response, ApiError> {
    let created = category_service::create_category(&state.db, &input).await?;
    info!(id = created.id, name = %created.name, "created category");
    let location = format!("/api/categories/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)).into_response())
}

#[utoipa::path(
    put, path = "/api/categories/{id}", tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryInput,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Name taken by another category or invalid fields", body = crate::openapi::MessageResponse),
        (status = 404, description = "Not Found", body = crate::openapi::MessageResponse)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<StatusCode, ApiError> {
    category_service::update_category(&state.db, id, &input).await?;
    info!(id, "updated category");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete, path = "/api/categories/{id}", tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Category still owns products", body = crate::openapi::MessageResponse),
        (status = 404, description = "Not Found", body = crate::openapi::MessageResponse)
    )
)]
pub async fn delete(State(state): State<AppState>, AppPath(id): AppPath<i32>) -> Result<StatusCode, ApiError> {
    category_service::delete_category(&state.db, id).await?;
    info!(id, "deleted category");
    Ok(StatusCode::NO_CONTENT)
}
