//! HTTP handler modules and shared response helpers.

use actix_web::HttpResponse;

use crate::dto::ApiError;
use crate::models::auth::AuthenticatedUser;
use crate::services::ServiceError;

pub mod comms;
pub mod contacts;
pub mod events;
pub mod groups;
pub mod newsletter;
pub mod notifications;
pub mod reports;
pub mod settings;
pub mod transport;
pub mod visits;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Returns whether the role list carries the given role.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

/// Guards a handler body: callers early-return the response on `Err`.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> Result<(), HttpResponse> {
    if check_role(role, &user.roles) {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiError::new("insufficient permissions")))
    }
}

/// Maps service failures onto JSON error responses, logging the ones that
/// indicate something actually broke.
pub fn error_response(error: ServiceError) -> HttpResponse {
    match error {
        ServiceError::Unauthorized => {
            HttpResponse::Forbidden().json(ApiError::new("insufficient permissions"))
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(ApiError::new("not found")),
        ServiceError::Validation(details) => {
            HttpResponse::BadRequest().json(ApiError::with_details("validation failed", details))
        }
        ServiceError::Conflict(details) => {
            HttpResponse::Conflict().json(ApiError::with_details("conflict", details))
        }
        ServiceError::Repository(e) => {
            log::error!("Repository error: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("internal error"))
        }
        ServiceError::Relay(e) => {
            log::error!("Relay error: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("internal error"))
        }
    }
}

/// CSV download response with the attachment headers the dashboard expects.
pub fn csv_response(filename: &str, body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            actix_web::http::header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body)
}
