use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::CrmError;
use crate::models::user_model::{Role, User};
use crate::store::Document;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // User id
    pub role: String, // admin / salesman
    pub exp: usize,   // Expiry timestamp
}

pub fn hash_password(password: &str) -> Result<String, CrmError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| CrmError::Internal("Failed to hash password".to_string()))
}

/// Check `password` against a stored hash. Argon2 PHC strings are what this
/// server writes; bcrypt hashes (`$2a$`, `$2b$`, `$2y$`) from older data are
/// still accepted.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    if stored_hash.starts_with("$2") {
        return bcrypt::verify(password, stored_hash).unwrap_or(false);
    }

    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Look up `email` and check the password. Unknown email and wrong password
/// are indistinguishable to the caller.
pub fn authenticate<'a>(doc: &'a Document, email: &str, password: &str) -> Result<&'a User, CrmError> {
    let user = doc
        .users
        .iter()
        .find(|u| u.email == email.trim())
        .ok_or(CrmError::InvalidCredentials)?;

    if !verify_password(&user.password, password) {
        return Err(CrmError::InvalidCredentials);
    }
    Ok(user)
}

pub fn generate_jwt(user_id: &Uuid, role: Role, secret: &str, ttl_hours: i64) -> Result<String, CrmError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| CrmError::Internal("Token expiry out of range".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|_| CrmError::Internal("Failed to generate JWT".to_string()))
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<AuthUser, CrmError> {
    let failed = || CrmError::Unauthenticated("Not authorized, token failed".to_string());

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| failed())?;

    let id = Uuid::parse_str(&data.claims.sub).map_err(|_| failed())?;
    let role = data.claims.role.parse::<Role>().map_err(|_| failed())?;
    Ok(AuthUser { id, role })
}

/// The decoded session: who is calling and with which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn auth_user_from_request(req: &HttpRequest) -> Result<AuthUser, CrmError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| CrmError::Internal("Application state missing".to_string()))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| CrmError::Unauthenticated("Not authorized, no token".to_string()))?;

    decode_jwt(token, &state.config.jwt_secret)
}

impl FromRequest for AuthUser {
    type Error = CrmError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(auth_user_from_request(req))
    }
}

/// An [`AuthUser`] whose role is admin.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

impl FromRequest for AdminUser {
    type Error = CrmError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(auth_user_from_request(req).and_then(|user| {
            if user.is_admin() {
                Ok(AdminUser(user))
            } else {
                Err(CrmError::Forbidden("Not authorized as an admin".to_string()))
            }
        }))
    }
}
