//! Newsletter subscribers and issues.

use actix_web::{HttpResponse, Responder, get, post, web};
use validator::Validate;

use crate::domain::types::EmailAddress;
use crate::dto::{ApiError, ApiMessage};
use crate::forms::newsletter::{AddIssueForm, AddSubscriberForm, UnsubscribeForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{DieselRepository, IssueReader, IssueWriter, SubscriberReader,
    SubscriberWriter};
use crate::routes::{ensure_role, error_response};
use crate::services::newsletter as newsletter_service;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

#[get("/v1/newsletter/subscribers")]
pub async fn list_subscribers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.list_subscribers(user.church_id, false) {
        Ok(subscribers) => HttpResponse::Ok().json(subscribers),
        Err(e) => {
            log::error!("Failed to list subscribers: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/newsletter/subscribers")]
pub async fn add_subscriber(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddSubscriberForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    match repo.upsert_subscribers(&[form.into_domain(user.church_id)]) {
        Ok(1) => HttpResponse::Created().json(ApiMessage::ok("subscriber added")),
        Ok(_) => HttpResponse::Ok().json(ApiMessage::ok("address already subscribed")),
        Err(e) => {
            log::error!("Failed to add subscriber: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/newsletter/subscribers/sync")]
pub async fn sync_subscribers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    match newsletter_service::sync_contacts(repo.get_ref(), user.church_id) {
        Ok(added) => {
            HttpResponse::Ok().json(ApiMessage::ok(format!("{added} subscribers added")))
        }
        Err(e) => error_response(e),
    }
}

#[post("/v1/newsletter/unsubscribe")]
/// Unauthenticated endpoint backing the unsubscribe link in sent mail.
pub async fn unsubscribe(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UnsubscribeForm>,
) -> impl Responder {
    let email = match EmailAddress::new(&form.email) {
        Ok(email) => email,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(ApiError::with_details("validation failed", e.to_string()));
        }
    };

    match repo.unsubscribe(form.church_id, email.as_str()) {
        Ok(true) => HttpResponse::Ok().json(ApiMessage::ok("unsubscribed")),
        Ok(false) => HttpResponse::NotFound().json(ApiError::new("address not found")),
        Err(e) => {
            log::error!("Failed to unsubscribe: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/newsletter/issues")]
pub async fn list_issues(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.list_issues(user.church_id) {
        Ok(issues) => HttpResponse::Ok().json(issues),
        Err(e) => {
            log::error!("Failed to list issues: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/newsletter/issues")]
pub async fn add_issue(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddIssueForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    match repo.create_issue(&form.into_domain(user.church_id)) {
        Ok(issue) => HttpResponse::Created().json(issue),
        Err(e) => {
            log::error!("Failed to create issue: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/newsletter/issues/{issue_id}/send")]
pub async fn send_issue(
    issue_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    match newsletter_service::send_issue(repo.get_ref(), user.church_id, issue_id.into_inner()) {
        Ok((issue, queued)) => HttpResponse::Ok().json(serde_json::json!({
            "issue": issue,
            "queued": queued,
        })),
        Err(e) => error_response(e),
    }
}
