use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProductReview as DomainNewProductReview, ProductReview as DomainProductReview,
};

#[derive(Debug, Clone, Identifiable, Queryable, Associations, Selectable)]
#[diesel(
    table_name = crate::schema::product_reviews,
    belongs_to(super::product::Product, foreign_key = product_id)
)]
pub struct ProductReview {
    pub id: i32,
    pub product_id: i32,
    pub rating: i32,
    pub comment: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub reviewed_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_reviews)]
pub struct NewProductReview<'a> {
    pub product_id: i32,
    pub rating: i32,
    pub comment: &'a str,
    pub reviewer_name: &'a str,
    pub reviewer_email: &'a str,
    pub reviewed_at: NaiveDateTime,
}

impl From<ProductReview> for DomainProductReview {
    fn from(value: ProductReview) -> Self {
        Self {
            id: value.id,
            rating: value.rating,
            comment: value.comment,
            reviewer_name: value.reviewer_name,
            reviewer_email: value.reviewer_email,
            date: value.reviewed_at,
        }
    }
}

impl<'a> NewProductReview<'a> {
    pub fn from_domain(product_id: i32, value: &'a DomainNewProductReview) -> Self {
        Self {
            product_id,
            rating: value.rating,
            comment: value.comment.as_str(),
            reviewer_name: value.reviewer_name.as_str(),
            reviewer_email: value.reviewer_email.as_str(),
            reviewed_at: value.date,
        }
    }
}
