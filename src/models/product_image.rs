use diesel::prelude::*;

use crate::domain::product::{
    NewProductImage as DomainNewProductImage, ProductImage as DomainProductImage,
};

#[derive(Debug, Clone, Identifiable, Queryable, Associations, Selectable)]
#[diesel(
    table_name = crate::schema::product_images,
    belongs_to(super::product::Product, foreign_key = product_id)
)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub url: String,
    pub is_primary: bool,
    pub sort_order: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct NewProductImage<'a> {
    pub product_id: i32,
    pub url: &'a str,
    pub is_primary: bool,
    pub sort_order: i32,
}

impl From<ProductImage> for DomainProductImage {
    fn from(value: ProductImage) -> Self {
        Self {
            id: value.id,
            url: value.url,
            is_primary: value.is_primary,
            sort_order: value.sort_order,
        }
    }
}

impl<'a> NewProductImage<'a> {
    pub fn from_domain(product_id: i32, value: &'a DomainNewProductImage) -> Self {
        Self {
            product_id,
            url: value.url.as_str(),
            is_primary: value.is_primary,
            sort_order: value.sort_order,
        }
    }
}
