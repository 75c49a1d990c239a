use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{
    Dimensions, NewProduct, NewProductImage, NewProductReview, Product, UpdateProduct,
};
use crate::domain::tag::TAG_NAME_MAX_LEN;

/// Maximum allowed length for a product title.
const TITLE_MAX_LEN: u64 = 200;
/// Maximum allowed length for a category or brand.
const CATEGORY_MAX_LEN: u64 = 100;
/// Maximum allowed length for a SKU.
const SKU_MAX_LEN: u64 = 64;

const DEFAULT_BRAND: &str = "Unknown";
const DEFAULT_WARRANTY: &str = "No warranty";
const DEFAULT_SHIPPING: &str = "Standard shipping";
const DEFAULT_AVAILABILITY: &str = "In Stock";
const DEFAULT_RETURN_POLICY: &str = "No returns";

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product payloads.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided title is empty after sanitization.
    #[error("product title cannot be empty")]
    EmptyTitle,
    /// The provided SKU is empty after sanitization.
    #[error("product SKU cannot be empty")]
    EmptySku,
    /// A tag name is longer than [`TAG_NAME_MAX_LEN`] characters once trimmed.
    #[error("tag {index} is longer than {TAG_NAME_MAX_LEN} characters")]
    TagTooLong { index: usize },
    /// A review carried a rating outside 1..=5.
    #[error("review {index} has rating {rating}, expected 1 to 5")]
    InvalidReviewRating { index: usize, rating: i32 },
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DimensionsPayload {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub depth: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
    /// When the review was left. Defaults to the request time.
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewer_name: String,
    #[serde(default)]
    pub reviewer_email: String,
}

/// Barcode and QR code carried in the `meta` object. Timestamps sent by the
/// client are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPayload {
    pub barcode: Option<String>,
    pub qr_code: Option<String>,
}

/// JSON body accepted when creating or updating a product.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 1, max = TITLE_MAX_LEN))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = CATEGORY_MAX_LEN))]
    pub category: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_percentage: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    /// Raw tag names. `None` on update leaves the product's tags untouched.
    pub tags: Option<Vec<String>>,
    #[validate(length(max = CATEGORY_MAX_LEN))]
    pub brand: Option<String>,
    #[validate(length(min = 1, max = SKU_MAX_LEN))]
    pub sku: String,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub weight: f64,
    pub dimensions: Option<DimensionsPayload>,
    pub warranty_information: Option<String>,
    pub shipping_information: Option<String>,
    pub availability_status: Option<String>,
    pub reviews: Option<Vec<ReviewPayload>>,
    pub return_policy: Option<String>,
    #[serde(default = "default_minimum_order_quantity")]
    #[validate(range(min = 1))]
    pub minimum_order_quantity: i32,
    pub meta: Option<MetaPayload>,
    pub images: Option<Vec<String>>,
    pub thumbnail: Option<String>,
}

fn default_minimum_order_quantity() -> i32 {
    1
}

/// A validated product ready to insert, with the raw tag names it was
/// submitted with.
#[derive(Debug, Clone)]
pub struct NewProductSubmission {
    pub product: NewProduct,
    pub tags: Vec<String>,
}

/// A validated product patch, with the raw tag names when the payload
/// carried a tag list.
#[derive(Debug, Clone)]
pub struct ProductUpdateSubmission {
    pub update: UpdateProduct,
    pub tags: Option<Vec<String>>,
}

impl ProductPayload {
    /// Sanitized SKU as it will be stored.
    pub fn normalized_sku(&self) -> String {
        sanitize_sku(&self.sku)
    }

    /// Validates the payload and fills defaults for missing optional values.
    pub fn into_new_product(self, now: NaiveDateTime) -> ProductFormResult<NewProductSubmission> {
        self.validate()?;

        let title = sanitize_inline_text(&self.title);
        if title.is_empty() {
            return Err(ProductFormError::EmptyTitle);
        }

        let sku = sanitize_sku(&self.sku);
        if sku.is_empty() {
            return Err(ProductFormError::EmptySku);
        }

        check_tag_lengths(self.tags.as_deref().unwrap_or_default())?;

        let thumbnail = self
            .thumbnail
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let images = build_images(self.images.as_deref().unwrap_or_default(), &thumbnail);
        let reviews = build_reviews(self.reviews.as_deref().unwrap_or_default(), now)?;
        let (barcode, qr_code) = match &self.meta {
            Some(meta) => (
                meta.barcode.as_deref().map(str::trim).unwrap_or_default(),
                meta.qr_code.as_deref().map(str::trim).unwrap_or_default(),
            ),
            None => ("", ""),
        };

        let product = NewProduct {
            title,
            description: sanitize_multiline_text(&self.description),
            category: sanitize_inline_text(&self.category),
            price_cents: price_to_cents(self.price),
            discount_percentage: self.discount_percentage,
            rating: self.rating,
            stock: self.stock,
            brand: text_or(self.brand.as_deref(), DEFAULT_BRAND),
            sku,
            weight: self.weight,
            dimensions: self.dimensions.map(Dimensions::from).unwrap_or_default(),
            warranty_information: text_or(self.warranty_information.as_deref(), DEFAULT_WARRANTY),
            shipping_information: text_or(self.shipping_information.as_deref(), DEFAULT_SHIPPING),
            availability_status: text_or(
                self.availability_status.as_deref(),
                DEFAULT_AVAILABILITY,
            ),
            return_policy: text_or(self.return_policy.as_deref(), DEFAULT_RETURN_POLICY),
            minimum_order_quantity: self.minimum_order_quantity,
            thumbnail,
            barcode: barcode.to_string(),
            qr_code: qr_code.to_string(),
            created_at: now,
            updated_at: now,
            images,
            reviews,
        };

        Ok(NewProductSubmission {
            product,
            tags: self.tags.unwrap_or_default(),
        })
    }

    /// Validates the payload and merges it over the stored product.
    ///
    /// Missing optional text values keep what is stored; images and reviews
    /// are not part of an update.
    pub fn into_update_product(
        self,
        existing: &Product,
        now: NaiveDateTime,
    ) -> ProductFormResult<ProductUpdateSubmission> {
        self.validate()?;

        let title = sanitize_inline_text(&self.title);
        if title.is_empty() {
            return Err(ProductFormError::EmptyTitle);
        }

        let sku = sanitize_sku(&self.sku);
        if sku.is_empty() {
            return Err(ProductFormError::EmptySku);
        }

        check_tag_lengths(self.tags.as_deref().unwrap_or_default())?;

        let (barcode, qr_code) = match &self.meta {
            Some(meta) => (
                meta.barcode
                    .as_deref()
                    .map(|value| value.trim().to_string())
                    .unwrap_or_else(|| existing.meta.barcode.clone()),
                meta.qr_code
                    .as_deref()
                    .map(|value| value.trim().to_string())
                    .unwrap_or_else(|| existing.meta.qr_code.clone()),
            ),
            None => (existing.meta.barcode.clone(), existing.meta.qr_code.clone()),
        };

        let update = UpdateProduct {
            title,
            description: sanitize_multiline_text(&self.description),
            category: sanitize_inline_text(&self.category),
            price_cents: price_to_cents(self.price),
            discount_percentage: self.discount_percentage,
            rating: self.rating,
            stock: self.stock,
            brand: text_or(self.brand.as_deref(), &existing.brand),
            sku,
            weight: self.weight,
            dimensions: self
                .dimensions
                .map(Dimensions::from)
                .unwrap_or(existing.dimensions),
            warranty_information: text_or(
                self.warranty_information.as_deref(),
                &existing.warranty_information,
            ),
            shipping_information: text_or(
                self.shipping_information.as_deref(),
                &existing.shipping_information,
            ),
            availability_status: text_or(
                self.availability_status.as_deref(),
                &existing.availability_status,
            ),
            return_policy: text_or(self.return_policy.as_deref(), &existing.return_policy),
            minimum_order_quantity: self.minimum_order_quantity,
            thumbnail: text_or(self.thumbnail.as_deref(), &existing.thumbnail),
            barcode,
            qr_code,
            updated_at: now,
        };

        Ok(ProductUpdateSubmission {
            update,
            tags: self.tags,
        })
    }
}

impl From<DimensionsPayload> for Dimensions {
    fn from(value: DimensionsPayload) -> Self {
        Self {
            width: value.width,
            height: value.height,
            depth: value.depth,
        }
    }
}

/// Convert a decimal price into the smallest currency unit.
pub fn price_to_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

fn check_tag_lengths(tags: &[String]) -> ProductFormResult<()> {
    match tags
        .iter()
        .position(|name| name.trim().chars().count() > TAG_NAME_MAX_LEN)
    {
        Some(index) => Err(ProductFormError::TagTooLong { index }),
        None => Ok(()),
    }
}

fn build_images(urls: &[String], thumbnail: &str) -> Vec<NewProductImage> {
    urls.iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .enumerate()
        .map(|(index, url)| NewProductImage {
            url: url.to_string(),
            is_primary: !thumbnail.is_empty() && url.to_lowercase() == thumbnail.to_lowercase(),
            sort_order: index as i32,
        })
        .collect()
}

fn build_reviews(
    reviews: &[ReviewPayload],
    now: NaiveDateTime,
) -> ProductFormResult<Vec<NewProductReview>> {
    reviews
        .iter()
        .enumerate()
        .map(|(index, review)| {
            if !(1..=5).contains(&review.rating) {
                return Err(ProductFormError::InvalidReviewRating {
                    index,
                    rating: review.rating,
                });
            }

            Ok(NewProductReview {
                rating: review.rating,
                comment: sanitize_multiline_text(&review.comment),
                reviewer_name: sanitize_inline_text(&review.reviewer_name),
                reviewer_email: review.reviewer_email.trim().to_string(),
                date: review.date.map(|date| date.naive_utc()).unwrap_or(now),
            })
        })
        .collect()
}

/// Sanitized `value`, or `fallback` when it is missing or blank.
fn text_or(value: Option<&str>, fallback: &str) -> String {
    value
        .map(sanitize_inline_text)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

fn sanitize_sku(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
}

fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    let mut result = Vec::with_capacity(lines.len());
    let mut previous_empty = false;
    for line in lines {
        if line.is_empty() {
            if previous_empty {
                continue;
            }
            previous_empty = true;
        } else {
            previous_empty = false;
        }
        result.push(line);
    }

    result.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|date| date.and_hms_opt(10, 0, 0))
            .expect("valid timestamp")
    }

    fn minimal_payload() -> ProductPayload {
        serde_json::from_value(json!({
            "title": "  Essence   Mascara ",
            "description": "Volumizing mascara",
            "category": "beauty",
            "price": 9.99,
            "sku": " BEA-ESS-001 "
        }))
        .expect("payload should deserialize")
    }

    #[test]
    fn new_product_applies_defaults() {
        let submission = minimal_payload()
            .into_new_product(fixed_now())
            .expect("expected conversion to succeed");
        let product = submission.product;

        assert_eq!(product.title, "Essence Mascara");
        assert_eq!(product.sku, "BEA-ESS-001");
        assert_eq!(product.price_cents, 999);
        assert_eq!(product.brand, DEFAULT_BRAND);
        assert_eq!(product.warranty_information, DEFAULT_WARRANTY);
        assert_eq!(product.shipping_information, DEFAULT_SHIPPING);
        assert_eq!(product.availability_status, DEFAULT_AVAILABILITY);
        assert_eq!(product.return_policy, DEFAULT_RETURN_POLICY);
        assert_eq!(product.minimum_order_quantity, 1);
        assert_eq!(product.dimensions, Dimensions::default());
        assert_eq!(product.created_at, fixed_now());
        assert_eq!(product.updated_at, fixed_now());
        assert!(product.images.is_empty());
        assert!(submission.tags.is_empty());
    }

    #[test]
    fn new_product_marks_thumbnail_image_primary() {
        let mut payload = minimal_payload();
        payload.thumbnail = Some("https://cdn.example.com/A.png".to_string());
        payload.images = Some(vec![
            "https://cdn.example.com/b.png".to_string(),
            "  ".to_string(),
            "https://cdn.example.com/a.png".to_string(),
        ]);

        let product = payload
            .into_new_product(fixed_now())
            .expect("expected conversion to succeed")
            .product;

        assert_eq!(product.images.len(), 2);
        assert!(!product.images[0].is_primary);
        assert_eq!(product.images[0].sort_order, 0);
        assert!(product.images[1].is_primary);
        assert_eq!(product.images[1].sort_order, 1);
    }

    #[test]
    fn new_product_rejects_out_of_range_review() {
        let mut payload = minimal_payload();
        payload.reviews = Some(vec![ReviewPayload {
            rating: 6,
            comment: "Too good".to_string(),
            date: None,
            reviewer_name: "Eve".to_string(),
            reviewer_email: "eve@example.com".to_string(),
        }]);

        let result = payload.into_new_product(fixed_now());

        assert!(matches!(
            result,
            Err(ProductFormError::InvalidReviewRating {
                index: 0,
                rating: 6
            })
        ));
    }

    #[test]
    fn new_product_rejects_negative_price() {
        let mut payload = minimal_payload();
        payload.price = -1.0;

        let result = payload.into_new_product(fixed_now());

        assert!(matches!(result, Err(ProductFormError::Validation(_))));
    }

    #[test]
    fn new_product_rejects_blank_sku() {
        let mut payload = minimal_payload();
        payload.sku = "   ".to_string();

        let result = payload.into_new_product(fixed_now());

        assert!(matches!(result, Err(ProductFormError::EmptySku)));
    }

    #[test]
    fn update_keeps_stored_values_for_missing_fields() {
        let created = minimal_payload()
            .into_new_product(fixed_now())
            .expect("expected conversion to succeed")
            .product;
        let existing = Product {
            id: 3,
            title: created.title.clone(),
            description: created.description.clone(),
            category: created.category.clone(),
            price_cents: created.price_cents,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: 0,
            brand: "Essence".to_string(),
            sku: created.sku.clone(),
            weight: 0.0,
            dimensions: Dimensions {
                width: 1.0,
                height: 2.0,
                depth: 3.0,
            },
            warranty_information: "1 year".to_string(),
            shipping_information: created.shipping_information.clone(),
            availability_status: created.availability_status.clone(),
            return_policy: created.return_policy.clone(),
            minimum_order_quantity: 1,
            thumbnail: "thumb.png".to_string(),
            meta: crate::domain::product::ProductMeta {
                created_at: fixed_now(),
                updated_at: fixed_now(),
                barcode: "123".to_string(),
                qr_code: "qr".to_string(),
            },
            images: Vec::new(),
            reviews: Vec::new(),
            tags: Vec::new(),
        };
        let later = fixed_now() + chrono::Duration::hours(1);

        let mut payload = minimal_payload();
        payload.price = 12.5;
        payload.meta = Some(MetaPayload {
            barcode: Some("456".to_string()),
            qr_code: None,
        });

        let submission = payload
            .into_update_product(&existing, later)
            .expect("expected conversion to succeed");
        let update = submission.update;

        assert_eq!(update.price_cents, 1250);
        assert_eq!(update.brand, "Essence");
        assert_eq!(update.warranty_information, "1 year");
        assert_eq!(update.thumbnail, "thumb.png");
        assert_eq!(update.dimensions, existing.dimensions);
        assert_eq!(update.barcode, "456");
        assert_eq!(update.qr_code, "qr");
        assert_eq!(update.updated_at, later);
        assert!(submission.tags.is_none());
    }

    #[test]
    fn review_dates_accept_utc_timestamps() {
        let review: ReviewPayload = serde_json::from_value(json!({
            "rating": 4,
            "comment": "Nice",
            "date": "2024-05-23T08:56:21.618Z",
            "reviewerName": "John Doe",
            "reviewerEmail": "john@example.com"
        }))
        .expect("review should deserialize");

        let reviews = build_reviews(&[review], fixed_now()).expect("valid review");

        assert_eq!(reviews[0].reviewer_name, "John Doe");
        assert_ne!(reviews[0].date, fixed_now());
    }

    #[test]
    fn multiline_text_collapses_blank_runs() {
        assert_eq!(sanitize_multiline_text("\n a \n\n\n b \n"), "a\n\nb");
    }
    #[test]
    fn tag_names_longer_than_limit_are_rejected() {
        let mut payload = minimal_payload();
        payload.tags = Some(vec![
            "ok".to_string(),
            "x".repeat(TAG_NAME_MAX_LEN + 1),
        ]);

        let result = payload.into_new_product(fixed_now());

        assert!(matches!(
            result,
            Err(ProductFormError::TagTooLong { index: 1 })
        ));
    }

    #[test]
    fn tag_length_is_measured_after_trimming() {
        let mut payload = minimal_payload();
        payload.tags = Some(vec![format!("  {}  ", "ä".repeat(TAG_NAME_MAX_LEN))]);

        let submission = payload
            .into_new_product(fixed_now())
            .expect("a name of exactly the limit is accepted");

        assert_eq!(submission.tags.len(), 1);
    }
}
