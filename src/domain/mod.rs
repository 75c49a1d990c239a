//! Plain domain types shared by the repository, service and route layers.

pub mod auth;
pub mod product;
pub mod product_tag;
pub mod tag;
pub mod user;
