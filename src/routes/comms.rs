//! Templates and campaigns.

use actix_web::{HttpResponse, Responder, delete, get, post, web};
use std::sync::Arc;
use validator::Validate;

use crate::dto::{ApiError, ApiMessage};
use crate::forms::comms::{
    AddCampaignForm, AddTemplateForm, CampaignListParams, SaveTemplateForm, ScheduleCampaignForm,
};
use crate::models::auth::AuthenticatedUser;
use crate::relay::ZmqRelay;
use crate::repository::{CampaignReader, CampaignWriter, DieselRepository, TemplateReader,
    TemplateWriter};
use crate::routes::{ensure_role, error_response};
use crate::services::campaign as campaign_service;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

#[get("/v1/templates")]
pub async fn list_templates(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.list_templates(user.church_id) {
        Ok(templates) => HttpResponse::Ok().json(templates),
        Err(e) => {
            log::error!("Failed to list templates: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/templates")]
pub async fn add_template(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddTemplateForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    match repo.create_template(&form.into_domain(user.church_id)) {
        Ok(template) => HttpResponse::Created().json(template),
        Err(e) => {
            log::error!("Failed to create template: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/templates/{template_id}")]
pub async fn show_template(
    template_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.get_template_by_id(template_id.into_inner(), user.church_id) {
        Ok(Some(template)) => HttpResponse::Ok().json(template),
        Ok(None) => HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get template: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/templates/{template_id}")]
pub async fn save_template(
    template_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SaveTemplateForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    let template_id = template_id.into_inner();
    match repo.get_template_by_id(template_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get template: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.update_template(template_id, &form.into()) {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(e) => {
            log::error!("Failed to update template: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[delete("/v1/templates/{template_id}")]
pub async fn delete_template(
    template_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    let template_id = template_id.into_inner();
    match repo.get_template_by_id(template_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get template: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.delete_template(template_id) {
        Ok(()) => HttpResponse::Ok().json(ApiMessage::ok("template deleted")),
        Err(e) => {
            log::error!("Failed to delete template: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/campaigns")]
pub async fn list_campaigns(
    params: web::Query<CampaignListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.list_campaigns(user.church_id, params.status) {
        Ok(campaigns) => HttpResponse::Ok().json(campaigns),
        Err(e) => {
            log::error!("Failed to list campaigns: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/campaigns")]
pub async fn add_campaign(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddCampaignForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    let new_campaign = form.into_domain(user.church_id, &user.sub);
    match campaign_service::create_campaign(repo.get_ref(), &new_campaign) {
        Ok(campaign) => HttpResponse::Created().json(campaign),
        Err(e) => error_response(e),
    }
}

#[get("/v1/campaigns/metrics")]
pub async fn comms_metrics(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.comms_metrics(user.church_id) {
        Ok(metrics) => HttpResponse::Ok().json(metrics),
        Err(e) => {
            log::error!("Failed to load comms metrics: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/campaigns/{campaign_id}")]
pub async fn show_campaign(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.get_campaign_by_id(campaign_id.into_inner(), user.church_id) {
        Ok(Some(campaign)) => HttpResponse::Ok().json(campaign),
        Ok(None) => HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get campaign: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[delete("/v1/campaigns/{campaign_id}")]
pub async fn delete_campaign(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    let campaign_id = campaign_id.into_inner();
    match repo.get_campaign_by_id(campaign_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get campaign: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.delete_campaign(campaign_id) {
        Ok(()) => HttpResponse::Ok().json(ApiMessage::ok("campaign deleted")),
        Err(e) => {
            log::error!("Failed to delete campaign: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/campaigns/{campaign_id}/schedule")]
pub async fn schedule_campaign(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ScheduleCampaignForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    match campaign_service::schedule(
        repo.get_ref(),
        campaign_id.into_inner(),
        user.church_id,
        form.scheduled_at,
    ) {
        Ok(campaign) => HttpResponse::Ok().json(campaign),
        Err(e) => error_response(e),
    }
}

#[post("/v1/campaigns/{campaign_id}/cancel")]
pub async fn cancel_campaign(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    match campaign_service::cancel(repo.get_ref(), campaign_id.into_inner(), user.church_id) {
        Ok(campaign) => HttpResponse::Ok().json(campaign),
        Err(e) => error_response(e),
    }
}

#[post("/v1/campaigns/{campaign_id}/send")]
pub async fn send_campaign(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    relay: web::Data<Arc<ZmqRelay>>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    match campaign_service::dispatch_now(
        repo.get_ref(),
        relay.get_ref().as_ref(),
        campaign_id.into_inner(),
        user.church_id,
    ) {
        Ok(campaign) => HttpResponse::Ok().json(campaign),
        Err(e) => error_response(e),
    }
}

#[get("/v1/campaigns/{campaign_id}/metrics")]
pub async fn campaign_metrics(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match campaign_service::metrics(repo.get_ref(), campaign_id.into_inner(), user.church_id) {
        Ok(metrics) => HttpResponse::Ok().json(metrics),
        Err(e) => error_response(e),
    }
}
