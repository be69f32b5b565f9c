//! Contact CRUD, search and CSV upload.

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use actix_web::{HttpResponse, Responder, delete, get, post, web};
use std::io::Read;
use validator::Validate;

use crate::dto::{ApiError, ApiMessage};
use crate::forms::contact::{AddContactForm, ContactListParams, SaveContactForm};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::Paginated;
use crate::repository::{ContactListQuery, ContactReader, ContactWriter, DieselRepository};
use crate::routes::{DEFAULT_ITEMS_PER_PAGE, ensure_role, error_response};
use crate::services::export::parse_contacts_csv;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

#[get("/v1/contacts")]
pub async fn list_contacts(
    params: web::Query<ContactListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    let page = params.page.unwrap_or(1);
    let mut query = ContactListQuery::new(user.church_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        query = query.search(q);
    }
    if let Some(lifecycle) = params.lifecycle {
        query = query.lifecycle(lifecycle);
    }

    match repo.list_contacts(query) {
        Ok((total, contacts)) => HttpResponse::Ok().json(Paginated::new(
            contacts,
            page,
            total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
        )),
        Err(e) => {
            log::error!("Failed to list contacts: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/contacts")]
pub async fn add_contact(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddContactForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    match repo.create_contacts(&[form.into_domain(user.church_id)]) {
        Ok(1) => HttpResponse::Created().json(ApiMessage::ok("contact created")),
        Ok(_) => HttpResponse::Conflict()
            .json(ApiError::new("a contact with this email already exists")),
        Err(e) => {
            log::error!("Failed to add contact: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/contacts/{contact_id}")]
pub async fn show_contact(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.get_contact_by_id(contact_id.into_inner(), user.church_id) {
        Ok(Some(contact)) => HttpResponse::Ok().json(contact),
        Ok(None) => HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get contact: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/contacts/{contact_id}")]
pub async fn save_contact(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SaveContactForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    let contact_id = contact_id.into_inner();
    match repo.get_contact_by_id(contact_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get contact: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.update_contact(contact_id, &form.into()) {
        Ok(contact) => HttpResponse::Ok().json(contact),
        Err(e) => {
            log::error!("Failed to update contact: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[delete("/v1/contacts/{contact_id}")]
pub async fn delete_contact(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    let contact_id = contact_id.into_inner();
    match repo.get_contact_by_id(contact_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get contact: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.delete_contact(contact_id) {
        Ok(()) => HttpResponse::Ok().json(ApiMessage::ok("contact deleted")),
        Err(e) => {
            log::error!("Failed to delete contact: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(MultipartForm)]
pub struct UploadContactsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

#[post("/v1/contacts/upload")]
pub async fn contacts_upload(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(mut form): MultipartForm<UploadContactsForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    let mut data = Vec::new();
    if let Err(e) = form.csv.file.read_to_end(&mut data) {
        log::error!("Failed to read uploaded CSV: {e}");
        return HttpResponse::BadRequest().json(ApiError::new("could not read uploaded file"));
    }

    let contacts = match parse_contacts_csv(&data, user.church_id) {
        Ok(contacts) => contacts,
        Err(e) => return error_response(e),
    };

    match repo.create_contacts(&contacts) {
        Ok(inserted) => HttpResponse::Ok().json(ApiMessage::ok(format!(
            "{inserted} contacts imported, {} skipped",
            contacts.len() - inserted
        ))),
        Err(e) => {
            log::error!("Failed to import contacts: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
