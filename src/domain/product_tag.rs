use serde::{Deserialize, Serialize};

/// Link between a product and a tag. The pair is the identity of the link.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ProductTag {
    /// Identifier of the product the tag is attached to.
    pub product_id: i32,
    /// Identifier of the referenced tag record.
    pub tag_id: i32,
}

impl ProductTag {
    /// Construct an association between a product and a tag.
    pub fn new(product_id: i32, tag_id: i32) -> Self {
        Self { product_id, tag_id }
    }
}
