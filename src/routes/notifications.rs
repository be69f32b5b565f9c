//! Notification dispatch, the in-app feed and per-user preferences.

use actix_web::{HttpResponse, Responder, get, post, web};
use std::sync::Arc;
use validator::Validate;

use crate::dto::{ApiError, ApiMessage};
use crate::forms::notification::{MarkReadForm, PreferenceForm, SendNotificationForm};
use crate::models::auth::AuthenticatedUser;
use crate::relay::ZmqRelay;
use crate::repository::{DieselRepository, NotificationReader, NotificationWriter};
use crate::routes::{ensure_role, error_response};
use crate::services::notification as notification_service;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

#[post("/v1/notifications/send")]
pub async fn send_notification(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    relay: web::Data<Arc<ZmqRelay>>,
    web::Json(form): web::Json<SendNotificationForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    let payload = (&form).into();
    match notification_service::notify(
        repo.get_ref(),
        relay.get_ref().as_ref(),
        user.church_id,
        form.recipient_email.as_deref(),
        &form.recipient_roles,
        &payload,
    ) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(e),
    }
}

#[get("/v1/notifications")]
pub async fn list_notifications(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.list_in_app_notifications(user.church_id, &user.sub) {
        Ok(notifications) => HttpResponse::Ok().json(notifications),
        Err(e) => {
            log::error!("Failed to list notifications: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/notifications/read")]
pub async fn mark_read(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<MarkReadForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.mark_notifications_read(&user.sub, &form.ids) {
        Ok(updated) => HttpResponse::Ok().json(ApiMessage::ok(format!("{updated} marked read"))),
        Err(e) => {
            log::error!("Failed to mark notifications read: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/notifications/preferences")]
pub async fn save_preference(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PreferenceForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.set_user_preference(&form.into_domain(&user.sub)) {
        Ok(()) => HttpResponse::Ok().json(ApiMessage::ok("preference saved")),
        Err(e) => {
            log::error!("Failed to save notification preference: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
