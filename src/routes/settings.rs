//! Admin settings: custom field definitions and notification switches.

use actix_web::{HttpResponse, Responder, delete, get, post, web};
use validator::Validate;

use crate::domain::notification::GlobalSettings;
use crate::dto::{ApiError, ApiMessage};
use crate::forms::settings::{
    AddCustomFieldForm, CustomFieldListParams, NotificationSettingsForm,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    CustomFieldReader, CustomFieldWriter, DieselRepository, NotificationReader,
    NotificationWriter,
};
use crate::routes::{ensure_role, error_response};
use crate::services::ServiceError;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

#[get("/v1/settings/fields")]
pub async fn list_custom_fields(
    params: web::Query<CustomFieldListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.list_custom_fields(user.church_id, params.entity.as_deref()) {
        Ok(fields) => HttpResponse::Ok().json(fields),
        Err(e) => {
            log::error!("Failed to list custom fields: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/settings/fields")]
pub async fn add_custom_field(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddCustomFieldForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    let field = form.into_domain(user.church_id);
    if let Err(e) = field.validate() {
        return error_response(ServiceError::from(e));
    }

    match repo.create_custom_field(&field) {
        Ok(created) => HttpResponse::Created().json(created),
        Err(e) => {
            log::error!("Failed to create custom field: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[delete("/v1/settings/fields/{field_id}")]
pub async fn delete_custom_field(
    field_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    match repo.delete_custom_field(field_id.into_inner(), user.church_id) {
        Ok(()) => HttpResponse::Ok().json(ApiMessage::ok("field deleted")),
        Err(crate::repository::errors::RepositoryError::NotFound) => {
            HttpResponse::NotFound().json(ApiError::new("not found"))
        }
        Err(e) => {
            log::error!("Failed to delete custom field: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/settings/notifications")]
pub async fn show_notification_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    let global = match repo.get_global_settings(user.church_id) {
        Ok(settings) => settings.unwrap_or(GlobalSettings {
            church_id: user.church_id,
            email_enabled: true,
            push_enabled: true,
            sms_enabled: true,
            in_app_enabled: true,
        }),
        Err(e) => {
            log::error!("Failed to load notification settings: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let types = match repo.list_type_settings(user.church_id) {
        Ok(types) => types,
        Err(e) => {
            log::error!("Failed to load notification type settings: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "global": global,
        "types": types,
    }))
}

#[post("/v1/settings/notifications")]
pub async fn save_notification_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<NotificationSettingsForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    if let Err(e) = repo.upsert_global_settings(&form.global.into_domain(user.church_id)) {
        log::error!("Failed to save notification settings: {e}");
        return HttpResponse::InternalServerError().finish();
    }

    for type_setting in form.types {
        if let Err(e) = repo.upsert_type_setting(&type_setting.into_domain(user.church_id)) {
            log::error!("Failed to save notification type setting: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    HttpResponse::Ok().json(ApiMessage::ok("notification settings saved"))
}
