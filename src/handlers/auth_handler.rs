use actix_web::{get, post, web, HttpResponse};
use chrono::Local;

use crate::app::AppState;
use crate::error::CrmError;
use crate::models::auth_model::{LoginRequest, LoginResponse};
use crate::services::attendance::record_login_attendance;
use crate::utils::auth::{authenticate, generate_jwt, AuthUser};

/// Check credentials, issue a token and mark the day's attendance.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, CrmError> {
    let req = body.into_inner();

    let doc = state.store.load().await;
    let user = authenticate(&doc, &req.email, &req.password)?.clone();

    let token = generate_jwt(
        &user.id,
        user.role,
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
    )?;

    state
        .store
        .update(|doc| {
            record_login_attendance(doc, user.id, Local::now());
            Ok(())
        })
        .await?;

    log::info!("User {} logged in", user.id);

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: user.public(),
    }))
}

#[get("/me")]
pub async fn me(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse, CrmError> {
    let doc = state.store.load().await;
    let found = doc
        .users
        .iter()
        .find(|u| u.id == user.id)
        .ok_or_else(|| CrmError::NotFound("User not found".to_string()))?;
    Ok(HttpResponse::Ok().json(found.public()))
}
