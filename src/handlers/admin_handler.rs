use actix_web::{get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::CrmError;
use crate::models::user_model::{NewSeller, SellerPatch};
use crate::services::sellers;
use crate::utils::auth::{hash_password, AdminUser};

#[post("/admin/sellers")]
pub async fn add_seller(
    state: web::Data<AppState>,
    _admin: AdminUser,
    body: web::Json<NewSeller>,
) -> Result<HttpResponse, CrmError> {
    let input = body.into_inner();
    sellers::validate_new_seller(&input)?;

    let password_hash = hash_password(&input.password)?;
    let seller = state
        .store
        .update(|doc| sellers::add_seller(doc, input, password_hash))
        .await?;

    Ok(HttpResponse::Created().json(seller))
}

#[get("/admin/sellers")]
pub async fn get_sellers(state: web::Data<AppState>, _admin: AdminUser) -> HttpResponse {
    let doc = state.store.load().await;
    HttpResponse::Ok().json(sellers::list_sellers(&doc))
}

#[put("/admin/sellers/{id}")]
pub async fn update_seller(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
    body: web::Json<SellerPatch>,
) -> Result<HttpResponse, CrmError> {
    let id = path.into_inner();
    let patch = body.into_inner();

    let seller = state
        .store
        .update(|doc| sellers::update_seller(doc, id, patch))
        .await?;
    Ok(HttpResponse::Ok().json(seller))
}
