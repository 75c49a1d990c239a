//! Access tokens, password hashing and the bearer-token extractor.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};

use crate::domain::auth::AuthenticatedUser;
use crate::routes::ErrorBody;

pub mod jwt;
pub mod password;

use jwt::JwtService;

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let Some(jwt) = req.app_data::<web::Data<JwtService>>() else {
        log::error!("JwtService is not registered as app data");
        return Err(InternalError::from_response(
            "authentication is not configured",
            HttpResponse::InternalServerError().json(ErrorBody::new("Internal server error.")),
        )
        .into());
    };

    let token = bearer_token(req).ok_or_else(|| unauthorized("Missing bearer token."))?;

    let claims = jwt.verify_token(token).map_err(|err| {
        log::debug!("Rejected access token: {err}");
        unauthorized("Invalid or expired token.")
    })?;

    AuthenticatedUser::try_from(claims).map_err(|_| unauthorized("Invalid or expired token."))
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn unauthorized(message: &'static str) -> actix_web::Error {
    InternalError::from_response(
        message,
        HttpResponse::Unauthorized().json(ErrorBody::new(message)),
    )
    .into()
}
