use actix_web::{HttpResponse, Responder, post, web};
use chrono::Utc;
use serde_json::json;

use crate::auth::jwt::JwtService;
use crate::config::ServerConfig;
use crate::forms::users::{LoginForm, RegisterForm};
use crate::repository::DieselRepository;
use crate::routes::{ErrorBody, error_response, run_blocking};
use crate::services::{ServiceError, auth};

#[post("/api/users/register")]
pub async fn register(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    body: web::Json<RegisterForm>,
) -> impl Responder {
    let repo = repo.into_inner();
    let server_config = server_config.into_inner();
    let form = body.into_inner();
    let now = Utc::now().naive_utc();

    match run_blocking(move |cancel| {
        auth::register(
            repo.as_ref(),
            cancel,
            &server_config.admin_emails,
            form,
            now,
        )
    })
    .await
    {
        Ok(_) => HttpResponse::Ok().json(json!({ "message": "User registered successfully" })),
        Err(err) => error_response(err, "register user"),
    }
}

#[post("/api/users/login")]
pub async fn login(
    repo: web::Data<DieselRepository>,
    jwt: web::Data<JwtService>,
    body: web::Json<LoginForm>,
) -> impl Responder {
    let repo = repo.into_inner();
    let jwt = jwt.into_inner();
    let form = body.into_inner();
    let now = Utc::now();

    match run_blocking(move |cancel| auth::login(repo.as_ref(), cancel, &jwt, form, now)).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Unauthorized().json(ErrorBody::new("Invalid Email or Password"))
        }
        Err(err) => error_response(err, "log in"),
    }
}
