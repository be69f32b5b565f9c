//! Events, attendance tracking and CSV export.

use actix_web::{HttpResponse, Responder, delete, get, post, web};
use chrono::Utc;
use validator::Validate;

use crate::dto::{ApiError, ApiMessage};
use crate::forms::event::{
    AddEventForm, CheckInForm, EventListParams, ExportEventsForm, SaveEventForm,
};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::Paginated;
use crate::repository::{
    AttendanceReader, AttendanceWriter, ContactReader, DieselRepository, EventListQuery,
    EventReader, EventWriter,
};
use crate::routes::{DEFAULT_ITEMS_PER_PAGE, csv_response, ensure_role, error_response};
use crate::services::export;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

#[get("/v1/events")]
pub async fn list_events(
    params: web::Query<EventListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    let page = params.page.unwrap_or(1);
    let mut query = EventListQuery::new(user.church_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(from) = params.from {
        query = query.from(from);
    }
    if let Some(to) = params.to {
        query = query.to(to);
    }

    match repo.list_events(query) {
        Ok((total, events)) => HttpResponse::Ok().json(Paginated::new(
            events,
            page,
            total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
        )),
        Err(e) => {
            log::error!("Failed to list events: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/events")]
pub async fn add_event(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddEventForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    match repo.create_event(&form.into_domain(user.church_id)) {
        Ok(event) => HttpResponse::Created().json(event),
        Err(e) => {
            log::error!("Failed to create event: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/events/{event_id}")]
pub async fn show_event(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.get_event_by_id(event_id.into_inner(), user.church_id) {
        Ok(Some(event)) => HttpResponse::Ok().json(event),
        Ok(None) => HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get event: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/events/{event_id}")]
pub async fn save_event(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SaveEventForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    let event_id = event_id.into_inner();
    match repo.get_event_by_id(event_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get event: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.update_event(event_id, &form.into()) {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(e) => {
            log::error!("Failed to update event: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[delete("/v1/events/{event_id}")]
pub async fn delete_event(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    let event_id = event_id.into_inner();
    match repo.get_event_by_id(event_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get event: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.delete_event(event_id) {
        Ok(()) => HttpResponse::Ok().json(ApiMessage::ok("event deleted")),
        Err(e) => {
            log::error!("Failed to delete event: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/events/export")]
pub async fn export_events(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ExportEventsForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    let events = match repo.get_events_by_ids(&form.event_ids, user.church_id) {
        Ok(events) => events,
        Err(e) => {
            log::error!("Failed to load events for export: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match export::events_csv(&events) {
        Ok(csv) => csv_response("events.csv", csv),
        Err(e) => error_response(e),
    }
}

#[get("/v1/events/{event_id}/attendance")]
pub async fn list_attendance(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    let event_id = event_id.into_inner();
    match repo.get_event_by_id(event_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get event: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    let records = match repo.list_attendance(event_id) {
        Ok(records) => records,
        Err(e) => {
            log::error!("Failed to list attendance: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let count = records.len();
    let rows: Vec<serde_json::Value> = records
        .into_iter()
        .map(|(record, contact)| {
            serde_json::json!({
                "record": record,
                "contact_name": contact.full_name(),
            })
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "count": count,
        "records": rows,
    }))
}

#[post("/v1/attendance")]
pub async fn check_in(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CheckInForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.get_event_by_id(form.event_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("event not found")),
        Err(e) => {
            log::error!("Failed to get event: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.get_contact_by_id(form.contact_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("contact not found")),
        Err(e) => {
            log::error!("Failed to get contact: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    let record = form.into_domain(user.church_id, Utc::now().naive_utc());
    match repo.create_attendance_record(&record) {
        Ok(created) => HttpResponse::Created().json(created),
        Err(crate::repository::errors::RepositoryError::ConstraintViolation(_)) => {
            HttpResponse::Conflict().json(ApiError::new("contact is already checked in"))
        }
        Err(e) => {
            log::error!("Failed to record attendance: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/events/{event_id}/attendance/export")]
pub async fn export_attendance(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    let event_id = event_id.into_inner();
    match repo.get_event_by_id(event_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get event: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    let records = match repo.list_attendance(event_id) {
        Ok(records) => records,
        Err(e) => {
            log::error!("Failed to list attendance: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match export::attendance_csv(&records) {
        Ok(csv) => csv_response("attendance.csv", csv),
        Err(e) => error_response(e),
    }
}
