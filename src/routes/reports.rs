//! Finance records and the report endpoints.

use actix_web::{HttpResponse, Responder, get, post, web};
use validator::Validate;

use crate::dto::ApiError;
use crate::forms::finance::{AddExpenseForm, AddTransactionForm, ReportParams};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{DieselRepository, FinanceWriter};
use crate::routes::{ensure_role, error_response};
use crate::services::report;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

#[post("/v1/finance/transactions")]
pub async fn add_transaction(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddTransactionForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    match repo.create_transaction(&form.into_domain(user.church_id)) {
        Ok(tx) => HttpResponse::Created().json(tx),
        Err(e) => {
            log::error!("Failed to record transaction: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/finance/expenses")]
pub async fn add_expense(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddExpenseForm>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ADMIN_ROLE) {
        return response;
    }

    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest()
            .json(ApiError::with_details("validation failed", e.to_string()));
    }

    match repo.create_expense(&form.into_domain(user.church_id)) {
        Ok(expense) => HttpResponse::Created().json(expense),
        Err(e) => {
            log::error!("Failed to record expense: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/reports/financial")]
pub async fn financial_report(
    params: web::Query<ReportParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match report::financial_summary(repo.get_ref(), user.church_id, params.from, params.to) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response(e),
    }
}

#[get("/v1/reports/people")]
pub async fn people_report(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE) {
        return response;
    }

    match report::people_report(repo.get_ref(), user.church_id) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(e),
    }
}
