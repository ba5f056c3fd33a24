use actix_web::{get, web, HttpResponse};
use chrono::Local;

use crate::app::AppState;
use crate::error::CrmError;
use crate::services::dashboard;
use crate::utils::auth::{AdminUser, AuthUser};

#[get("/stats/admin")]
pub async fn admin_stats(state: web::Data<AppState>, _admin: AdminUser) -> HttpResponse {
    let doc = state.store.load().await;
    HttpResponse::Ok().json(dashboard::admin_stats(&doc, Local::now().date_naive()))
}

#[get("/stats/employee")]
pub async fn employee_stats(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, CrmError> {
    let doc = state.store.load().await;
    let stats = dashboard::employee_stats(&doc, user.id, Local::now().date_naive())?;
    Ok(HttpResponse::Ok().json(stats))
}
