use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::tag::Tag;
use crate::pagination::Pagination;

/// Physical size of a product, embedded in the product record.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// Bookkeeping values embedded in the product record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductMeta {
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub barcode: String,
    pub qr_code: String,
}

/// Image owned by a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: i32,
    pub url: String,
    /// Set on the image whose URL matches the product thumbnail.
    pub is_primary: bool,
    /// Position of the image in the submitted list.
    pub sort_order: i32,
}

/// Customer review owned by a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductReview {
    pub id: i32,
    /// Star rating between 1 and 5.
    pub rating: i32,
    pub comment: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub date: NaiveDateTime,
}

/// Domain representation of a catalog product with all owned collections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Price represented in the smallest currency unit (for example cents).
    pub price_cents: i64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i32,
    pub brand: String,
    /// Stock keeping unit, unique across all products.
    pub sku: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub return_policy: String,
    pub minimum_order_quantity: i32,
    pub thumbnail: String,
    pub meta: ProductMeta,
    pub images: Vec<ProductImage>,
    pub reviews: Vec<ProductReview>,
    pub tags: Vec<Tag>,
}

/// Image payload stored together with a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductImage {
    pub url: String,
    pub is_primary: bool,
    pub sort_order: i32,
}

/// Review payload stored together with a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductReview {
    pub rating: i32,
    pub comment: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub date: NaiveDateTime,
}

/// Payload required to insert a new product with its images and reviews.
///
/// Tags are not part of the payload; they are reconciled separately and
/// linked once the product row exists.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price_cents: i64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i32,
    pub brand: String,
    pub sku: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub return_policy: String,
    pub minimum_order_quantity: i32,
    pub thumbnail: String,
    pub barcode: String,
    pub qr_code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub images: Vec<NewProductImage>,
    pub reviews: Vec<NewProductReview>,
}

/// Full replacement of the scalar and embedded product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price_cents: i64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i32,
    pub brand: String,
    pub sku: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub return_policy: String,
    pub minimum_order_quantity: i32,
    pub thumbnail: String,
    pub barcode: String,
    pub qr_code: String,
    /// Timestamp captured for the request applying the patch.
    pub updated_at: NaiveDateTime,
}

/// Short identification of a stored product, returned by write endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductSummary {
    pub id: i32,
    pub title: String,
    pub sku: String,
}

impl From<&Product> for ProductSummary {
    fn from(value: &Product) -> Self {
        Self {
            id: value.id,
            title: value.title.clone(),
            sku: value.sku.clone(),
        }
    }
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Optional exact category filter.
    pub category: Option<String>,
    /// Optional exact brand filter.
    pub brand: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Filter the results by an exact category match.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filter the results by an exact brand match.
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
