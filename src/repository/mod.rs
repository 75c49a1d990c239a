use std::cell::RefCell;

use diesel::sqlite::SqliteConnection;
use tokio_util::sync::CancellationToken;

use crate::db::{DbConnection, DbPool};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::tag::{NewTag, Tag, TagListQuery};
use crate::domain::user::{NewUser, User, UserCredentials};
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub mod errors;
pub mod product;
pub mod tag;
pub mod user;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn get_product_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>>;
    /// Return the subset of `skus` already owned by a stored product.
    fn find_existing_skus(&self, skus: &[String]) -> RepositoryResult<Vec<String>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

/// Write operations over product records.
pub trait ProductWriter {
    /// Insert a product together with its images and reviews.
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    /// Replace the tag links of a product with exactly `tag_ids`.
    fn set_product_tags(&self, product_id: i32, tag_ids: &[i32]) -> RepositoryResult<()>;
}

/// Read-only operations over tag records.
pub trait TagReader {
    /// Case-insensitive exact lookup: return every stored tag whose key is in `keys`.
    fn find_tags_by_keys(&self, keys: &[String]) -> RepositoryResult<Vec<Tag>>;
    fn list_tags(&self, query: TagListQuery) -> RepositoryResult<(usize, Vec<Tag>)>;
}

/// Write operations over tag records.
pub trait TagWriter {
    fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
}

/// Read-only operations over user accounts.
pub trait UserReader {
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    fn get_user_by_user_name(&self, user_name: &str) -> RepositoryResult<Option<User>>;
    fn get_credentials_by_email(&self, email: &str) -> RepositoryResult<Option<UserCredentials>>;
}

/// Write operations over user accounts.
pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

/// Every repository operation, available inside a unit of work.
pub trait CatalogStore:
    ProductReader + ProductWriter + TagReader + TagWriter + UserReader + UserWriter
{
}

impl<T> CatalogStore for T where
    T: ProductReader + ProductWriter + TagReader + TagWriter + UserReader + UserWriter
{
}

/// Scope of staged changes committed atomically together.
pub trait UnitOfWork {
    /// Run `work` against a store bound to one transaction.
    ///
    /// Changes are committed when `work` returns `Ok` and rolled back
    /// otherwise. Once `cancel` fires, every further store call returns
    /// [`RepositoryError::Cancelled`] and nothing is committed.
    fn run<T, F>(&self, cancel: &CancellationToken, work: F) -> RepositoryResult<T>
    where
        F: FnOnce(&dyn CatalogStore) -> RepositoryResult<T>;
}

impl UnitOfWork for DieselRepository {
    fn run<T, F>(&self, cancel: &CancellationToken, work: F) -> RepositoryResult<T>
    where
        F: FnOnce(&dyn CatalogStore) -> RepositoryResult<T>,
    {
        if cancel.is_cancelled() {
            return Err(RepositoryError::Cancelled);
        }

        let mut conn = self.conn()?;

        // IMMEDIATE takes the write lock up front, so concurrent requests
        // cannot interleave between a tag lookup and the matching insert.
        conn.immediate_transaction::<T, RepositoryError, _>(|conn| {
            let store = DieselStore::new(conn, cancel.clone());
            let value = work(&store)?;
            if cancel.is_cancelled() {
                return Err(RepositoryError::Cancelled);
            }
            Ok(value)
        })
    }
}

/// Repository view over a connection that is inside an open transaction.
pub struct DieselStore<'c> {
    conn: RefCell<&'c mut SqliteConnection>,
    cancel: CancellationToken,
}

impl<'c> DieselStore<'c> {
    fn new(conn: &'c mut SqliteConnection, cancel: CancellationToken) -> Self {
        Self {
            conn: RefCell::new(conn),
            cancel,
        }
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        if self.cancel.is_cancelled() {
            return Err(RepositoryError::Cancelled);
        }

        let mut conn = self.conn.borrow_mut();
        f(&mut **conn)
    }
}
