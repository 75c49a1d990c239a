pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Role required to change the catalog.
pub const SERVICE_ACCESS_ROLE: &str = "admin";
