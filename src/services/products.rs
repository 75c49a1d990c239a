use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::product::{
    Dimensions, Product, ProductListQuery, ProductMeta, ProductReview, ProductSummary,
};
use crate::forms::products::{NewProductSubmission, ProductPayload};
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::errors::RepositoryError;
use crate::repository::{ProductReader, ProductWriter, UnitOfWork};
use crate::services::tags::{attach_tags, reconcile_tags};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the product listings.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Exact category filter.
    pub category: Option<String>,
    /// Exact brand filter.
    pub brand: Option<String>,
    /// Optional page (1-based). Without it every match is returned.
    pub page: Option<usize>,
}

/// Product as exposed by the API.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i32,
    pub tags: Vec<String>,
    pub brand: String,
    pub sku: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub reviews: Vec<ProductReview>,
    pub return_policy: String,
    pub minimum_order_quantity: i32,
    pub meta: ProductMeta,
    pub images: Vec<String>,
    pub thumbnail: String,
}

impl From<Product> for ProductView {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            category: value.category,
            price: value.price_cents as f64 / 100.0,
            discount_percentage: value.discount_percentage,
            rating: value.rating,
            stock: value.stock,
            tags: value.tags.into_iter().map(|tag| tag.name).collect(),
            brand: value.brand,
            sku: value.sku,
            weight: value.weight,
            dimensions: value.dimensions,
            warranty_information: value.warranty_information,
            shipping_information: value.shipping_information,
            availability_status: value.availability_status,
            reviews: value.reviews,
            return_policy: value.return_policy,
            minimum_order_quantity: value.minimum_order_quantity,
            meta: value.meta,
            images: value.images.into_iter().map(|image| image.url).collect(),
            thumbnail: value.thumbnail,
        }
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BulkCreated {
    pub count: usize,
    pub products: Vec<ProductSummary>,
}

fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.has_role(SERVICE_ACCESS_ROLE) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Lists products, optionally filtered by exact category and brand.
pub fn list_products<U>(
    uow: &U,
    cancel: &CancellationToken,
    query: ProductsQuery,
) -> ServiceResult<Vec<ProductView>>
where
    U: UnitOfWork + ?Sized,
{
    let ProductsQuery {
        category,
        brand,
        page,
    } = query;

    let mut list_query = ProductListQuery::default();

    if let Some(category) = category.filter(|value| !value.trim().is_empty()) {
        list_query = list_query.category(category);
    }

    if let Some(brand) = brand.filter(|value| !value.trim().is_empty()) {
        list_query = list_query.brand(brand);
    }

    if let Some(page) = page {
        list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);
    }

    let (_total, products) = uow
        .run(cancel, |store| store.list_products(list_query))
        .map_err(ServiceError::from)?;

    Ok(products.into_iter().map(ProductView::from).collect())
}

/// Loads a product with its images, reviews and tags.
pub fn get_product<U>(uow: &U, cancel: &CancellationToken, id: i32) -> ServiceResult<ProductView>
where
    U: UnitOfWork + ?Sized,
{
    uow.run(cancel, |store| store.get_product_by_id(id))
        .map_err(ServiceError::from)?
        .map(ProductView::from)
        .ok_or(ServiceError::NotFound)
}

/// Loads a product by its SKU.
pub fn get_product_by_sku<U>(
    uow: &U,
    cancel: &CancellationToken,
    sku: &str,
) -> ServiceResult<ProductView>
where
    U: UnitOfWork + ?Sized,
{
    uow.run(cancel, |store| store.get_product_by_sku(sku.trim()))
        .map_err(ServiceError::from)?
        .map(ProductView::from)
        .ok_or(ServiceError::NotFound)
}

/// Creates a product together with its images, reviews and tags.
pub fn create_product<U>(
    uow: &U,
    cancel: &CancellationToken,
    user: &AuthenticatedUser,
    payload: ProductPayload,
    now: NaiveDateTime,
) -> ServiceResult<ProductSummary>
where
    U: UnitOfWork + ?Sized,
{
    ensure_admin(user)?;

    let NewProductSubmission { product, tags } = payload
        .into_new_product(now)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let created = uow
        .run(cancel, |store| {
            if store.get_product_by_sku(&product.sku)?.is_some() {
                return Err(RepositoryError::Conflict(format!(
                    "Product with SKU '{}' already exists.",
                    product.sku
                )));
            }

            let resolved = reconcile_tags(store, &[tags], now)?;
            let mut created = store.create_product(&product)?;
            let tags = resolved.into_iter().next().unwrap_or_default();
            attach_tags(store, created.id, &tags)?;
            created.tags = tags;
            Ok(created)
        })
        .map_err(ServiceError::from)?;

    log::info!("Created product {} ({})", created.id, created.sku);

    Ok(ProductSummary::from(&created))
}

/// Creates every product of a batch in one unit of work.
///
/// The batch is rejected as a whole when it is empty, repeats a SKU or
/// contains a SKU that is already stored. Tags of the whole batch are
/// reconciled in one pass.
pub fn create_products_bulk<U>(
    uow: &U,
    cancel: &CancellationToken,
    user: &AuthenticatedUser,
    payloads: Vec<ProductPayload>,
    now: NaiveDateTime,
) -> ServiceResult<BulkCreated>
where
    U: UnitOfWork + ?Sized,
{
    ensure_admin(user)?;

    if payloads.is_empty() {
        return Err(ServiceError::Form("No products provided.".to_string()));
    }

    let mut seen = HashSet::with_capacity(payloads.len());
    let mut duplicates: Vec<String> = Vec::new();
    for sku in payloads.iter().map(ProductPayload::normalized_sku) {
        if !seen.insert(sku.clone()) && !duplicates.contains(&sku) {
            duplicates.push(sku);
        }
    }
    if !duplicates.is_empty() {
        return Err(ServiceError::Form(format!(
            "Duplicate SKUs in request: {}",
            duplicates.join(", ")
        )));
    }

    let mut products = Vec::with_capacity(payloads.len());
    let mut tag_lists = Vec::with_capacity(payloads.len());
    for (index, payload) in payloads.into_iter().enumerate() {
        let submission = payload
            .into_new_product(now)
            .map_err(|err| ServiceError::Form(format!("product {index}: {err}")))?;
        products.push(submission.product);
        tag_lists.push(submission.tags);
    }

    let summaries = uow
        .run(cancel, |store| {
            let skus: Vec<String> = products.iter().map(|product| product.sku.clone()).collect();
            let existing = store.find_existing_skus(&skus)?;
            if !existing.is_empty() {
                return Err(RepositoryError::Conflict(format!(
                    "Some SKUs already exist: {}",
                    existing.join(", ")
                )));
            }

            let resolved = reconcile_tags(store, &tag_lists, now)?;

            let mut summaries = Vec::with_capacity(products.len());
            for (product, tags) in products.iter().zip(resolved) {
                let created = store.create_product(product)?;
                attach_tags(store, created.id, &tags)?;
                summaries.push(ProductSummary::from(&created));
            }

            Ok(summaries)
        })
        .map_err(ServiceError::from)?;

    log::info!("Bulk created {} products", summaries.len());

    Ok(BulkCreated {
        count: summaries.len(),
        products: summaries,
    })
}

/// Applies a product payload over a stored product.
///
/// Tags are replaced only when the payload carries a tag list.
pub fn update_product<U>(
    uow: &U,
    cancel: &CancellationToken,
    user: &AuthenticatedUser,
    product_id: i32,
    payload: ProductPayload,
    now: NaiveDateTime,
) -> ServiceResult<ProductView>
where
    U: UnitOfWork + ?Sized,
{
    ensure_admin(user)?;

    let updated = uow
        .run(cancel, |store| {
            let existing = store
                .get_product_by_id(product_id)?
                .ok_or(RepositoryError::NotFound)?;

            let submission = payload
                .into_update_product(&existing, now)
                .map_err(|err| RepositoryError::ValidationError(err.to_string()))?;
            let update = submission.update;

            if update.sku != existing.sku
                && let Some(other) = store.get_product_by_sku(&update.sku)?
                && other.id != product_id
            {
                return Err(RepositoryError::Conflict(format!(
                    "Product with SKU '{}' already exists.",
                    update.sku
                )));
            }

            let mut updated = store.update_product(product_id, &update)?;

            if let Some(raw_tags) = submission.tags {
                let tags = reconcile_tags(store, &[raw_tags], now)?
                    .into_iter()
                    .next()
                    .unwrap_or_default();
                attach_tags(store, product_id, &tags)?;
                updated.tags = tags;
            }

            Ok(updated)
        })
        .map_err(ServiceError::from)?;

    log::info!("Updated product {product_id}");

    Ok(ProductView::from(updated))
}

/// Deletes a product with its images, reviews and tag links. Tags survive.
pub fn delete_product<U>(
    uow: &U,
    cancel: &CancellationToken,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<()>
where
    U: UnitOfWork + ?Sized,
{
    ensure_admin(user)?;

    uow.run(cancel, |store| store.delete_product(product_id))
        .map_err(ServiceError::from)?;

    log::info!("Deleted product {product_id}");

    Ok(())
}
