//! Transport pipeline endpoints and fleet management.

use actix_web::{HttpResponse, Responder, get, post, web};
use validator::Validate;

use crate::dto::transport::{SummaryResponse, TransportRequestView};
use crate::dto::{ApiError, ApiMessage};
use crate::forms::transport::{
    AddDriverForm, AddTransportRequestForm, AddVehicleForm, CapacityParams, PipelineForm,
    RosterDriverForm, TransportRequestListParams,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    ContactReader, DieselRepository, EventReader, TransportReader, TransportWriter,
};
use crate::routes::{ensure_role, error_response};
use crate::services::transport as transport_service;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

fn ensure_event(
    repo: &DieselRepository,
    event_id: i32,
    church_id: i32,
) -> Result<(), HttpResponse> {
    match repo.get_event_by_id(event_id, church_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiError::new("event not found"))),
        Err(e) => {
            log::error!("Failed to get event: {e}");
            Err(HttpResponse::InternalServerError().finish())
        }
    }
}

#[get("/v1/events/{event_id}/transport/summary")]
pub async fn transport_summary(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    let event_id = event_id.into_inner();
    if let Err(response) = ensure_event(&repo, event_id, user.church_id) {
        return response;
    }

    let summary = match transport_service::summary(repo.get_ref(), event_id) {
        Ok(summary) => summary,
        Err(e) => return error_response(e),
    };

    let requests = match repo.list_requests_with_contacts(event_id) {
        Ok(requests) => requests,
        Err(e) => {
            log::error!("Failed to list transport requests: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    HttpResponse::Ok().json(SummaryResponse {
        summary,
        requests: requests.into_iter().map(TransportRequestView::from).collect(),
    })
}

#[get("/v1/events/{event_id}/transport/routes")]
pub async fn transport_routes(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    let event_id = event_id.into_inner();
    if let Err(response) = ensure_event(&repo, event_id, user.church_id) {
        return response;
    }

    match repo.list_routes_with_fleet(event_id) {
        Ok(routes) => {
            let rows: Vec<serde_json::Value> = routes
                .into_iter()
                .map(|(route, driver, vehicle)| {
                    serde_json::json!({
                        "route": route,
                        "driver": driver,
                        "vehicle": vehicle,
                    })
                })
                .collect();
            HttpResponse::Ok().json(rows)
        }
        Err(e) => {
            log::error!("Failed to list routes: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/transport/requests")]
pub async fn list_transport_requests(
    params: web::Query<TransportRequestListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    if let Err(response) = ensure_event(&repo, params.event_id, user.church_id) {
        return response;
    }

    match repo.list_requests_with_contacts(params.event_id) {
        Ok(requests) => HttpResponse::Ok().json(
            requests
                .into_iter()
                .map(TransportRequestView::from)
                .collect::<Vec<_>>(),
        ),
        Err(e) => {
            log::error!("Failed to list transport requests: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/transport/requests")]
pub async fn add_transport_request(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddTransportRequestForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    if let Err(response) = ensure_event(&repo, form.event_id, user.church_id) {
        return response;
    }

    match repo.get_contact_by_id(form.contact_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("contact not found")),
        Err(e) => {
            log::error!("Failed to get contact: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.create_transport_request(&form.into_domain(user.church_id)) {
        Ok(request) => HttpResponse::Created().json(request),
        Err(e) => {
            log::error!("Failed to create transport request: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/transport/auto-assign")]
pub async fn auto_assign(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PipelineForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(response) = ensure_event(&repo, form.event_id, user.church_id) {
        return response;
    }

    match transport_service::auto_assign(repo.get_ref(), form.event_id) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(e),
    }
}

#[post("/v1/transport/generate-routes")]
pub async fn generate_routes(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PipelineForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(response) = ensure_event(&repo, form.event_id, user.church_id) {
        return response;
    }

    match transport_service::generate_routes(repo.get_ref(), user.church_id, form.event_id) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(e),
    }
}

#[post("/v1/transport/send-routes")]
pub async fn send_routes(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PipelineForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(response) = ensure_event(&repo, form.event_id, user.church_id) {
        return response;
    }

    match transport_service::send_routes(repo.get_ref(), user.church_id, form.event_id) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(e),
    }
}

#[get("/v1/transport/capacity")]
pub async fn vehicle_capacity(
    params: web::Query<CapacityParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.vehicle_utilization(user.church_id, params.event_id) {
        Ok(utilization) => HttpResponse::Ok().json(utilization),
        Err(e) => {
            log::error!("Failed to compute vehicle utilization: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/transport/drivers")]
pub async fn list_drivers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.list_drivers(user.church_id) {
        Ok(drivers) => HttpResponse::Ok().json(drivers),
        Err(e) => {
            log::error!("Failed to list drivers: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/transport/drivers")]
pub async fn add_driver(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddDriverForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    match repo.create_driver(&form.into_domain(user.church_id)) {
        Ok(driver) => HttpResponse::Created().json(driver),
        Err(e) => {
            log::error!("Failed to create driver: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/transport/vehicles")]
pub async fn list_vehicles(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.list_vehicles(user.church_id) {
        Ok(vehicles) => HttpResponse::Ok().json(vehicles),
        Err(e) => {
            log::error!("Failed to list vehicles: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/transport/vehicles")]
pub async fn add_vehicle(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddVehicleForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    match repo.create_vehicle(&form.into_domain(user.church_id)) {
        Ok(vehicle) => HttpResponse::Created().json(vehicle),
        Err(e) => {
            log::error!("Failed to create vehicle: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/transport/event-drivers")]
pub async fn roster_driver(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RosterDriverForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(response) = ensure_event(&repo, form.event_id, user.church_id) {
        return response;
    }

    match repo.roster_event_driver(&form.into()) {
        Ok(()) => HttpResponse::Ok().json(ApiMessage::ok("driver rostered")),
        Err(e) => {
            log::error!("Failed to roster driver: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
