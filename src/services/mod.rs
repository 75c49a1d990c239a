pub use errors::{ServiceError, ServiceResult};

pub mod auth;
pub mod errors;
pub mod products;
pub mod tags;
