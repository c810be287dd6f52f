use service::{
    dto::{CategoryDto, CategoryInput, CategoryWithProductsDto, ProductDto, ProductInput},
    pagination::ProductPage,
};
use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::routes::{categories, products};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// `{message}` body of 400 and 404 responses.
#[derive(ToSchema)]
pub struct MessageResponse { pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        categories::list,
        categories::get,
        categories::get_with_products,
        categories::create,
        categories::update,
        categories::delete,
        products::list,
        products::get,
        products::by_category,
        products::create,
        products::update,
        products::delete,
    ),
    components(
        schemas(
            HealthResponse,
            MessageResponse,
            CategoryDto,
            CategoryWithProductsDto,
            CategoryInput,
            ProductDto,
            ProductInput,
            ProductPage,
        )
    ),
    tags(
        (name = "health"),
        (name = "categories"),
        (name = "products")
    )
)]
pub struct ApiDoc;
