//! Relation dumps used when checking what the store actually holds.

use axum::{extract::State, Json};
use service::diagnostics::{self, CategoryTree, ProductTree};

use crate::{errors::ApiError, state::AppState};

pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryTree>>, ApiError> {
    Ok(Json(diagnostics::categories_with_products(&state.db).await?))
}

pub async fn products(State(state): State<AppState>) -> Result<Json<Vec<ProductTree>>, ApiError> {
    Ok(Json(diagnostics::products_with_category(&state.db).await?))
}
