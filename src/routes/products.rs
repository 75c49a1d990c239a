use actix_web::http::header;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use chrono::Utc;
use serde_json::json;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::products::ProductPayload;
use crate::repository::DieselRepository;
use crate::routes::{ErrorBody, error_response, run_blocking};
use crate::services::{ServiceError, products};

#[get("/api/products")]
pub async fn list_products(
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let repo = repo.into_inner();

    match run_blocking(move |cancel| {
        products::list_products(repo.as_ref(), cancel, products::ProductsQuery::default())
    })
    .await
    {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(err) => error_response(err, "list products"),
    }
}

#[get("/api/products/search")]
pub async fn search_products(
    params: web::Query<products::ProductsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let repo = repo.into_inner();
    let query = params.into_inner();

    match run_blocking(move |cancel| products::list_products(repo.as_ref(), cancel, query)).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(err) => error_response(err, "search products"),
    }
}

#[get("/api/products/{id}")]
pub async fn show_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = path.into_inner();
    let repo = repo.into_inner();

    match run_blocking(move |cancel| products::get_product(repo.as_ref(), cancel, id)).await {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().json(ErrorBody::new(format!(
            "Product with ID {id} not found."
        ))),
        Err(err) => error_response(err, "load product"),
    }
}

#[get("/api/products/sku/{sku}")]
pub async fn show_product_by_sku(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let sku = path.into_inner();
    let repo = repo.into_inner();
    let lookup = sku.clone();

    match run_blocking(move |cancel| products::get_product_by_sku(repo.as_ref(), cancel, &lookup))
        .await
    {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().json(ErrorBody::new(format!(
            "Product with SKU '{sku}' not found."
        ))),
        Err(err) => error_response(err, "load product by SKU"),
    }
}

#[post("/api/products")]
pub async fn create_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Json<ProductPayload>,
) -> impl Responder {
    let repo = repo.into_inner();
    let payload = body.into_inner();
    let now = Utc::now().naive_utc();

    match run_blocking(move |cancel| {
        products::create_product(repo.as_ref(), cancel, &user, payload, now)
    })
    .await
    {
        Ok(summary) => HttpResponse::Created()
            .insert_header((header::LOCATION, format!("/api/products/{}", summary.id)))
            .json(summary),
        Err(err) => error_response(err, "create product"),
    }
}

#[post("/api/products/bulk")]
pub async fn create_products_bulk(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Json<Vec<ProductPayload>>,
) -> impl Responder {
    let repo = repo.into_inner();
    let payloads = body.into_inner();
    let now = Utc::now().naive_utc();

    match run_blocking(move |cancel| {
        products::create_products_bulk(repo.as_ref(), cancel, &user, payloads, now)
    })
    .await
    {
        Ok(created) => HttpResponse::Ok().json(json!({
            "message": format!("{} products created successfully.", created.count),
            "count": created.count,
            "products": created.products,
        })),
        Err(err) => error_response(err, "bulk create products"),
    }
}

#[put("/api/products/{id}")]
pub async fn update_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Json<ProductPayload>,
) -> impl Responder {
    let id = path.into_inner();
    let repo = repo.into_inner();
    let payload = body.into_inner();
    let now = Utc::now().naive_utc();

    match run_blocking(move |cancel| {
        products::update_product(repo.as_ref(), cancel, &user, id, payload, now)
    })
    .await
    {
        Ok(product) => HttpResponse::Ok().json(json!({
            "message": "Product updated successfully.",
            "id": product.id,
        })),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().json(ErrorBody::new(format!(
            "Product with ID {id} not found."
        ))),
        Err(err) => error_response(err, "update product"),
    }
}

#[delete("/api/products/{id}")]
pub async fn delete_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = path.into_inner();
    let repo = repo.into_inner();

    match run_blocking(move |cancel| products::delete_product(repo.as_ref(), cancel, &user, id))
        .await
    {
        Ok(()) => HttpResponse::Ok().json(json!({
            "message": "Product deleted successfully.",
            "id": id,
        })),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().json(ErrorBody::new(format!(
            "Product with ID {id} not found."
        ))),
        Err(err) => error_response(err, "delete product"),
    }
}
