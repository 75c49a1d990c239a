//! HTTP handlers. Every handler runs its store work on the blocking pool under
//! a cancellation token that fires if the client goes away.

use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::services::{ServiceError, ServiceResult};

pub mod products;
pub mod tags;
pub mod users;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// JSON extractor settings answering malformed bodies with an [`ErrorBody`].
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorBody::new(message)))
            .into()
    })
}

/// Run `work` on the blocking thread pool.
///
/// If the handler future is dropped before `work` finishes, the token passed
/// to `work` is cancelled and its unit of work rolls back.
pub async fn run_blocking<T, F>(work: F) -> ServiceResult<T>
where
    F: FnOnce(&CancellationToken) -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let result = web::block(move || work(&cancel)).await;
    guard.disarm();

    match result {
        Ok(result) => result,
        Err(err) => {
            log::error!("Blocking task failed: {err}");
            Err(ServiceError::Internal)
        }
    }
}

/// Map a service error to its HTTP response. `action` names the failed
/// operation in the log.
pub fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().json(ErrorBody::new("Unauthorized."))
        }
        ServiceError::Forbidden => {
            HttpResponse::Forbidden().json(ErrorBody::new("Insufficient permissions."))
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(ErrorBody::new("Not found.")),
        ServiceError::Conflict(message) => HttpResponse::Conflict().json(ErrorBody::new(message)),
        ServiceError::Form(message) => HttpResponse::BadRequest().json(ErrorBody::new(message)),
        ServiceError::Cancelled => {
            log::info!("Request to {action} was cancelled");
            HttpResponse::RequestTimeout().json(ErrorBody::new("Request cancelled."))
        }
        ServiceError::Internal => {
            log::error!("Failed to {action}");
            HttpResponse::InternalServerError().json(ErrorBody::new("Internal server error."))
        }
    }
}
