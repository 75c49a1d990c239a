use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::product::{
        NewProduct as DomainNewProduct, Product as DomainProduct, ProductImage, ProductListQuery,
        ProductReview, UpdateProduct as DomainUpdateProduct,
    },
    domain::product_tag::ProductTag,
    domain::tag::Tag as DomainTag,
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
    },
    models::product_image::{NewProductImage as DbNewProductImage, ProductImage as DbProductImage},
    models::product_review::{
        NewProductReview as DbNewProductReview, ProductReview as DbProductReview,
    },
    models::product_tag::ProductTag as DbProductTag,
    models::tag::Tag as DbTag,
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{DieselStore, ProductReader, ProductWriter},
};

impl ProductReader for DieselStore<'_> {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let product = products::table
                .filter(products::id.eq(id))
                .first::<DbProduct>(conn)
                .optional()?;

            match product {
                Some(db_product) => Ok(load_details(conn, vec![db_product])?.pop()),
                None => Ok(None),
            }
        })
    }

    fn get_product_by_sku(&self, sku: &str) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let product = products::table
                .filter(products::sku.eq(sku))
                .first::<DbProduct>(conn)
                .optional()?;

            match product {
                Some(db_product) => Ok(load_details(conn, vec![db_product])?.pop()),
                None => Ok(None),
            }
        })
    }

    fn find_existing_skus(&self, skus: &[String]) -> RepositoryResult<Vec<String>> {
        use crate::schema::products;

        if skus.is_empty() {
            return Ok(Vec::new());
        }

        self.with_conn(|conn| {
            let existing = products::table
                .filter(products::sku.eq_any(skus))
                .select(products::sku)
                .order(products::sku.asc())
                .load::<String>(conn)?;
            Ok(existing)
        })
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let mut count_query = products::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(category) = query.category.as_ref() {
                count_query = count_query.filter(products::category.eq(category));
            }

            if let Some(brand) = query.brand.as_ref() {
                count_query = count_query.filter(products::brand.eq(brand));
            }

            let total = count_query.count().get_result::<i64>(conn)? as usize;

            let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(category) = query.category.as_ref() {
                items = items.filter(products::category.eq(category));
            }

            if let Some(brand) = query.brand.as_ref() {
                items = items.filter(products::brand.eq(brand));
            }

            items = items.order(products::id.asc());

            if let Some(pagination) = &query.pagination {
                items = items.offset(pagination.offset()).limit(pagination.limit());
            }

            let db_products = items.load::<DbProduct>(conn)?;

            Ok((total, load_details(conn, db_products)?))
        })
    }
}

impl ProductWriter for DieselStore<'_> {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::{product_images, product_reviews, products};

        self.with_conn(|conn| {
            let db_new = DbNewProduct::from(new_product);

            let created = diesel::insert_into(products::table)
                .values(&db_new)
                .get_result::<DbProduct>(conn)?;

            if !new_product.images.is_empty() {
                let images: Vec<DbNewProductImage> = new_product
                    .images
                    .iter()
                    .map(|image| DbNewProductImage::from_domain(created.id, image))
                    .collect();
                diesel::insert_into(product_images::table)
                    .values(&images)
                    .execute(conn)?;
            }

            if !new_product.reviews.is_empty() {
                let reviews: Vec<DbNewProductReview> = new_product
                    .reviews
                    .iter()
                    .map(|review| DbNewProductReview::from_domain(created.id, review))
                    .collect();
                diesel::insert_into(product_reviews::table)
                    .values(&reviews)
                    .execute(conn)?;
            }

            load_details(conn, vec![created])?
                .pop()
                .ok_or(RepositoryError::NotFound)
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let db_updates = DbUpdateProduct::from(updates);

            let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
                .set(&db_updates)
                .get_result::<DbProduct>(conn)?;

            load_details(conn, vec![updated])?
                .pop()
                .ok_or(RepositoryError::NotFound)
        })
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let deleted = diesel::delete(products::table.filter(products::id.eq(product_id)))
                .execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }

    fn set_product_tags(&self, product_id: i32, tag_ids: &[i32]) -> RepositoryResult<()> {
        use crate::schema::product_tags;

        self.with_conn(|conn| {
            diesel::delete(product_tags::table.filter(product_tags::product_id.eq(product_id)))
                .execute(conn)?;

            if tag_ids.is_empty() {
                return Ok(());
            }

            let links: Vec<DbProductTag> = tag_ids
                .iter()
                .map(|&tag_id| DbProductTag::from(&ProductTag::new(product_id, tag_id)))
                .collect();

            diesel::insert_into(product_tags::table)
                .values(&links)
                .execute(conn)?;

            Ok(())
        })
    }
}

/// Attach images, reviews and tags to the loaded rows, keeping their order.
fn load_details(
    conn: &mut SqliteConnection,
    db_products: Vec<DbProduct>,
) -> RepositoryResult<Vec<DomainProduct>> {
    if db_products.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = db_products.iter().map(|product| product.id).collect();
    let mut images = load_images_for_products(conn, &product_ids)?;
    let mut reviews = load_reviews_for_products(conn, &product_ids)?;
    let mut tags = load_tags_for_products(conn, &product_ids)?;

    let mut domain_products = Vec::with_capacity(db_products.len());
    for db_product in db_products {
        let mut domain: DomainProduct = db_product.into();
        domain.images = images.remove(&domain.id).unwrap_or_default();
        domain.reviews = reviews.remove(&domain.id).unwrap_or_default();
        domain.tags = tags.remove(&domain.id).unwrap_or_default();
        domain_products.push(domain);
    }

    Ok(domain_products)
}

fn load_images_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<ProductImage>>> {
    use crate::schema::product_images;

    let rows = product_images::table
        .filter(product_images::product_id.eq_any(product_ids))
        .order((product_images::sort_order.asc(), product_images::id.asc()))
        .load::<DbProductImage>(conn)?;

    let mut map: HashMap<i32, Vec<ProductImage>> = HashMap::new();
    for row in rows {
        map.entry(row.product_id).or_default().push(row.into());
    }

    Ok(map)
}

fn load_reviews_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<ProductReview>>> {
    use crate::schema::product_reviews;

    let rows = product_reviews::table
        .filter(product_reviews::product_id.eq_any(product_ids))
        .order(product_reviews::id.asc())
        .load::<DbProductReview>(conn)?;

    let mut map: HashMap<i32, Vec<ProductReview>> = HashMap::new();
    for row in rows {
        map.entry(row.product_id).or_default().push(row.into());
    }

    Ok(map)
}

fn load_tags_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainTag>>> {
    use crate::schema::{product_tags, tags};

    // Tags come back ordered by tag id, which is their creation order.
    let rows = product_tags::table
        .inner_join(tags::table)
        .filter(product_tags::product_id.eq_any(product_ids))
        .order((product_tags::product_id.asc(), tags::id.asc()))
        .select((product_tags::product_id, DbTag::as_select()))
        .load::<(i32, DbTag)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainTag>> = HashMap::new();
    for (product_id, tag) in rows {
        map.entry(product_id).or_default().push(tag.into());
    }

    Ok(map)
}
