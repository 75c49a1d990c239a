use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    Dimensions, NewProduct as DomainNewProduct, Product as DomainProduct, ProductMeta,
    UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
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
    pub width: f64,
    pub height: f64,
    pub depth: f64,
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
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub price_cents: i64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i32,
    pub brand: &'a str,
    pub sku: &'a str,
    pub weight: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub warranty_information: &'a str,
    pub shipping_information: &'a str,
    pub availability_status: &'a str,
    pub return_policy: &'a str,
    pub minimum_order_quantity: i32,
    pub thumbnail: &'a str,
    pub barcode: &'a str,
    pub qr_code: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub price_cents: i64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i32,
    pub brand: &'a str,
    pub sku: &'a str,
    pub weight: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub warranty_information: &'a str,
    pub shipping_information: &'a str,
    pub availability_status: &'a str,
    pub return_policy: &'a str,
    pub minimum_order_quantity: i32,
    pub thumbnail: &'a str,
    pub barcode: &'a str,
    pub qr_code: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            category: value.category,
            price_cents: value.price_cents,
            discount_percentage: value.discount_percentage,
            rating: value.rating,
            stock: value.stock,
            brand: value.brand,
            sku: value.sku,
            weight: value.weight,
            dimensions: Dimensions {
                width: value.width,
                height: value.height,
                depth: value.depth,
            },
            warranty_information: value.warranty_information,
            shipping_information: value.shipping_information,
            availability_status: value.availability_status,
            return_policy: value.return_policy,
            minimum_order_quantity: value.minimum_order_quantity,
            thumbnail: value.thumbnail,
            meta: ProductMeta {
                created_at: value.created_at,
                updated_at: value.updated_at,
                barcode: value.barcode,
                qr_code: value.qr_code,
            },
            images: Vec::new(),
            reviews: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            title: value.title.as_str(),
            description: value.description.as_str(),
            category: value.category.as_str(),
            price_cents: value.price_cents,
            discount_percentage: value.discount_percentage,
            rating: value.rating,
            stock: value.stock,
            brand: value.brand.as_str(),
            sku: value.sku.as_str(),
            weight: value.weight,
            width: value.dimensions.width,
            height: value.dimensions.height,
            depth: value.dimensions.depth,
            warranty_information: value.warranty_information.as_str(),
            shipping_information: value.shipping_information.as_str(),
            availability_status: value.availability_status.as_str(),
            return_policy: value.return_policy.as_str(),
            minimum_order_quantity: value.minimum_order_quantity,
            thumbnail: value.thumbnail.as_str(),
            barcode: value.barcode.as_str(),
            qr_code: value.qr_code.as_str(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            title: value.title.as_str(),
            description: value.description.as_str(),
            category: value.category.as_str(),
            price_cents: value.price_cents,
            discount_percentage: value.discount_percentage,
            rating: value.rating,
            stock: value.stock,
            brand: value.brand.as_str(),
            sku: value.sku.as_str(),
            weight: value.weight,
            width: value.dimensions.width,
            height: value.dimensions.height,
            depth: value.dimensions.depth,
            warranty_information: value.warranty_information.as_str(),
            shipping_information: value.shipping_information.as_str(),
            availability_status: value.availability_status.as_str(),
            return_policy: value.return_policy.as_str(),
            minimum_order_quantity: value.minimum_order_quantity,
            thumbnail: value.thumbnail.as_str(),
            barcode: value.barcode.as_str(),
            qr_code: value.qr_code.as_str(),
            updated_at: value.updated_at,
        }
    }
}
