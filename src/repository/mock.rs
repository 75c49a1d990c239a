use mockall::mock;
use tokio_util::sync::CancellationToken;

use super::errors::{RepositoryError, RepositoryResult};
use super::{
    CatalogStore, ProductReader, ProductWriter, TagReader, TagWriter, UnitOfWork, UserReader,
    UserWriter,
};
use crate::domain::{
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    tag::{NewTag, Tag, TagListQuery},
    user::{NewUser, User, UserCredentials},
};

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn get_product_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>>;
        fn find_existing_skus(&self, skus: &[String]) -> RepositoryResult<Vec<String>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
        fn set_product_tags(&self, product_id: i32, tag_ids: &[i32]) -> RepositoryResult<()>;
    }
}

mock! {
    pub TagReader {}

    impl TagReader for TagReader {
        fn find_tags_by_keys(&self, keys: &[String]) -> RepositoryResult<Vec<Tag>>;
        fn list_tags(&self, query: TagListQuery) -> RepositoryResult<(usize, Vec<Tag>)>;
    }
}

mock! {
    pub TagWriter {}

    impl TagWriter for TagWriter {
        fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
    }
}

mock! {
    pub UserReader {}

    impl UserReader for UserReader {
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn get_user_by_user_name(&self, user_name: &str) -> RepositoryResult<Option<User>>;
        fn get_credentials_by_email(&self, email: &str) -> RepositoryResult<Option<UserCredentials>>;
    }
}

mock! {
    pub UserWriter {}

    impl UserWriter for UserWriter {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }
}

/// Store assembled from the individual trait mocks.
///
/// `run` hands the store itself to the unit of work, so expectations set on
/// the inner mocks apply to the calls a service makes inside it.
#[derive(Default)]
pub struct MockStore {
    pub products: MockProductReader,
    pub product_writer: MockProductWriter,
    pub tags: MockTagReader,
    pub tag_writer: MockTagWriter,
    pub users: MockUserReader,
    pub user_writer: MockUserWriter,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductReader for MockStore {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>> {
        self.products.get_product_by_id(id)
    }

    fn get_product_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>> {
        self.products.get_product_by_sku(sku)
    }

    fn find_existing_skus(&self, skus: &[String]) -> RepositoryResult<Vec<String>> {
        self.products.find_existing_skus(skus)
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        self.products.list_products(query)
    }
}

impl ProductWriter for MockStore {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
        self.product_writer.create_product(new_product)
    }

    fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product> {
        self.product_writer.update_product(product_id, updates)
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        self.product_writer.delete_product(product_id)
    }

    fn set_product_tags(&self, product_id: i32, tag_ids: &[i32]) -> RepositoryResult<()> {
        self.product_writer.set_product_tags(product_id, tag_ids)
    }
}

impl TagReader for MockStore {
    fn find_tags_by_keys(&self, keys: &[String]) -> RepositoryResult<Vec<Tag>> {
        self.tags.find_tags_by_keys(keys)
    }

    fn list_tags(&self, query: TagListQuery) -> RepositoryResult<(usize, Vec<Tag>)> {
        self.tags.list_tags(query)
    }
}

impl TagWriter for MockStore {
    fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag> {
        self.tag_writer.create_tag(new_tag)
    }
}

impl UserReader for MockStore {
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.users.get_user_by_email(email)
    }

    fn get_user_by_user_name(&self, user_name: &str) -> RepositoryResult<Option<User>> {
        self.users.get_user_by_user_name(user_name)
    }

    fn get_credentials_by_email(&self, email: &str) -> RepositoryResult<Option<UserCredentials>> {
        self.users.get_credentials_by_email(email)
    }
}

impl UserWriter for MockStore {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        self.user_writer.create_user(new_user)
    }
}

impl UnitOfWork for MockStore {
    fn run<T, F>(&self, cancel: &CancellationToken, work: F) -> RepositoryResult<T>
    where
        F: FnOnce(&dyn CatalogStore) -> RepositoryResult<T>,
    {
        if cancel.is_cancelled() {
            return Err(RepositoryError::Cancelled);
        }
        work(self)
    }
}
