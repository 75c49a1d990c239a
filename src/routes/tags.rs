use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::{error_response, run_blocking};
use crate::services::tags::{TagQuery, list_tags};

#[get("/api/tags")]
pub async fn show_tags(
    params: web::Query<TagQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let repo = repo.into_inner();
    let query = params.into_inner();

    match run_blocking(move |cancel| list_tags(repo.as_ref(), cancel, query)).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list tags"),
    }
}
