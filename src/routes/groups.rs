//! Group CRUD and memberships.

use actix_web::{HttpResponse, Responder, delete, get, post, web};
use validator::Validate;

use crate::dto::{ApiError, ApiMessage};
use crate::forms::group::{AddGroupForm, AddGroupMemberForm, SaveGroupForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{ContactReader, DieselRepository, GroupReader, GroupWriter};
use crate::routes::ensure_role;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

#[get("/v1/groups")]
pub async fn list_groups(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match repo.list_groups_with_counts(user.church_id) {
        Ok(groups) => {
            let rows: Vec<serde_json::Value> = groups
                .into_iter()
                .map(|(group, member_count)| {
                    serde_json::json!({
                        "group": group,
                        "member_count": member_count,
                    })
                })
                .collect();
            HttpResponse::Ok().json(rows)
        }
        Err(e) => {
            log::error!("Failed to list groups: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/groups")]
pub async fn add_group(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddGroupForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    match repo.create_group(&form.into_domain(user.church_id)) {
        Ok(group) => HttpResponse::Created().json(group),
        Err(e) => {
            log::error!("Failed to create group: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/groups/{group_id}")]
pub async fn show_group(
    group_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    let group_id = group_id.into_inner();
    let group = match repo.get_group_by_id(group_id, user.church_id) {
        Ok(Some(group)) => group,
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get group: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let members = match repo.list_group_members(group_id) {
        Ok(members) => members,
        Err(e) => {
            log::error!("Failed to list group members: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let members: Vec<serde_json::Value> = members
        .into_iter()
        .map(|(membership, contact)| {
            serde_json::json!({
                "contact_id": contact.id,
                "name": contact.full_name(),
                "email": contact.email,
                "phone": contact.phone,
                "role": membership.role,
                "joined_at": membership.joined_at,
            })
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "group": group,
        "members": members,
    }))
}

#[post("/v1/groups/{group_id}")]
pub async fn save_group(
    group_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SaveGroupForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    let group_id = group_id.into_inner();
    match repo.get_group_by_id(group_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get group: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.update_group(group_id, &form.into()) {
        Ok(group) => HttpResponse::Ok().json(group),
        Err(e) => {
            log::error!("Failed to update group: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[delete("/v1/groups/{group_id}")]
pub async fn delete_group(
    group_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    let group_id = group_id.into_inner();
    match repo.get_group_by_id(group_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get group: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.delete_group(group_id) {
        Ok(()) => HttpResponse::Ok().json(ApiMessage::ok("group deleted")),
        Err(e) => {
            log::error!("Failed to delete group: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/groups/{group_id}/members")]
pub async fn add_group_member(
    group_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddGroupMemberForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    let group_id = group_id.into_inner();
    match repo.get_group_by_id(group_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("group not found")),
        Err(e) => {
            log::error!("Failed to get group: {e}");
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

    match repo.add_group_member(&form.into_domain(group_id)) {
        Ok(member) => HttpResponse::Created().json(member),
        Err(e) => {
            log::error!("Failed to add group member: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[delete("/v1/groups/{group_id}/members/{contact_id}")]
pub async fn remove_group_member(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    let (group_id, contact_id) = path.into_inner();
    match repo.get_group_by_id(group_id, user.church_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("not found")),
        Err(e) => {
            log::error!("Failed to get group: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    match repo.remove_group_member(group_id, contact_id) {
        Ok(()) => HttpResponse::Ok().json(ApiMessage::ok("member removed")),
        Err(e) => {
            log::error!("Failed to remove group member: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
