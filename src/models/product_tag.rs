use diesel::prelude::*;

use crate::domain::product_tag::ProductTag as DomainProductTag;

#[derive(Debug, Clone, Identifiable, Queryable, Associations, Selectable, Insertable)]
#[diesel(
    table_name = crate::schema::product_tags,
    primary_key(product_id, tag_id),
    belongs_to(super::product::Product, foreign_key = product_id),
    belongs_to(super::tag::Tag, foreign_key = tag_id)
)]
pub struct ProductTag {
    pub product_id: i32,
    pub tag_id: i32,
}

impl From<&DomainProductTag> for ProductTag {
    fn from(value: &DomainProductTag) -> Self {
        Self {
            product_id: value.product_id,
            tag_id: value.tag_id,
        }
    }
}
