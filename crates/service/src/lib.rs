//! Service layer for the product catalog.
//! - Category and product CRUD with the integrity rules of the catalog.
//! - Shapes entities into transfer records for the HTTP layer.
//! - Seeds an empty store with a fixed catalog.

pub mod errors;
pub mod dto;
pub mod guards;
pub mod pagination;
pub mod category_service;
pub mod product_service;
pub mod seed;
pub mod diagnostics;
#[cfg(test)]
pub mod test_support;
