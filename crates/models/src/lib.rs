//! sea-orm entities for the catalog schema, their relations and the field
//! validators shared by the service layer.

pub mod errors;
pub mod db;
pub mod category;
pub mod product;
pub mod user;
pub mod order;
pub mod order_item;
pub mod payment;

#[cfg(test)]
mod tests;
