//! Helpers for integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use serde_json::{Value, json};

use catalog_service::SERVICE_ACCESS_ROLE;
use catalog_service::db::{DbPool, establish_connection_pool};
use catalog_service::domain::auth::AuthenticatedUser;
use catalog_service::forms::products::ProductPayload;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

/// Fixed request time.
pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid timestamp")
}

pub fn admin() -> AuthenticatedUser {
    AuthenticatedUser {
        id: 1,
        user_name: "admin".into(),
        email: "admin@example.com".into(),
        full_name: "Admin".into(),
        roles: vec![SERVICE_ACCESS_ROLE.to_string()],
    }
}

/// Minimal valid product body with the given SKU and tags.
pub fn product_payload(sku: &str, tags: &[&str]) -> ProductPayload {
    payload_from(json!({
        "title": format!("Product {sku}"),
        "category": "beauty",
        "price": 9.99,
        "sku": sku,
        "tags": tags,
    }))
}

pub fn payload_from(value: Value) -> ProductPayload {
    serde_json::from_value(value).expect("valid product payload")
}
