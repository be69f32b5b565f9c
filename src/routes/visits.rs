//! Planned visits and their follow-up actions.

use actix_web::{HttpResponse, Responder, get, post, web};
use validator::Validate;

use crate::dto::{ApiError, ApiMessage};
use crate::forms::visit::{
    AddPlannedVisitForm, SavePlannedVisitForm, VisitListParams, VisitMessageForm,
};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::Paginated;
use crate::repository::{DieselRepository, VisitListQuery, VisitReader, VisitWriter};
use crate::routes::{DEFAULT_ITEMS_PER_PAGE, ensure_role, error_response};
use crate::services::visit as visit_service;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

#[get("/v1/planned-visits")]
pub async fn list_visits(
    params: web::Query<VisitListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    let page = params.page.unwrap_or(1);
    let mut query = VisitListQuery::new(user.church_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(status) = params.status {
        query = query.status(status);
    }

    match repo.list_visits(query) {
        Ok((total, visits)) => HttpResponse::Ok().json(Paginated::new(
            visits,
            page,
            total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
        )),
        Err(e) => {
            log::error!("Failed to list planned visits: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/planned-visits")]
pub async fn add_visit(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddPlannedVisitForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    match repo.create_visit(&form.into_domain(user.church_id)) {
        Ok(visit) => HttpResponse::Created().json(visit),
        Err(e) => {
            log::error!("Failed to create planned visit: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/planned-visits/{visit_id}")]
pub async fn show_visit(
    visit_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.get_visit_by_id(visit_id.into_inner(), user.church_id) {
        Ok(Some(visit)) => HttpResponse::Ok().json(visit),
        Ok(None) => HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get planned visit: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/planned-visits/{visit_id}")]
pub async fn save_visit(
    visit_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SavePlannedVisitForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    let visit_id = visit_id.into_inner();
    match repo.get_visit_by_id(visit_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get planned visit: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.update_visit(visit_id, &form.into()) {
        Ok(visit) => HttpResponse::Ok().json(visit),
        Err(e) => {
            log::error!("Failed to update planned visit: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/planned-visits/{visit_id}/convert")]
pub async fn convert_visit(
    visit_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    match visit_service::convert_visit(repo.get_ref(), user.church_id, visit_id.into_inner()) {
        Ok(visit) => HttpResponse::Ok().json(visit),
        Err(e) => error_response(e),
    }
}

#[post("/v1/planned-visits/{visit_id}/message")]
pub async fn message_visit(
    visit_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<VisitMessageForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    match visit_service::send_follow_up(
        repo.get_ref(),
        user.church_id,
        visit_id.into_inner(),
        &form.subject,
        &form.body,
    ) {
        Ok(()) => HttpResponse::Ok().json(ApiMessage::ok("follow-up queued")),
        Err(e) => error_response(e),
    }
}
