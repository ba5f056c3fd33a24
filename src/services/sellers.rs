//! Admin management of salesperson accounts.

use uuid::Uuid;

use crate::error::CrmError;
use crate::models::user_model::{NewSeller, PublicUser, Role, SellerPatch, User};
use crate::store::Document;

/// Append a salesperson. `password_hash` is the already-hashed password.
pub fn add_seller(
    doc: &mut Document,
    input: NewSeller,
    password_hash: String,
) -> Result<PublicUser, CrmError> {
    let email = input.email.trim().to_string();

    if doc.users.iter().any(|u| u.email == email) {
        return Err(CrmError::Validation("User already exists".to_string()));
    }

    let seller = User {
        id: Uuid::new_v4(),
        name: input.name.trim().to_string(),
        email,
        password: password_hash,
        role: Role::Salesman,
        zone: input.zone.trim().to_string(),
    };
    let public = seller.public();

    log::info!("Salesman {} added in zone {:?}", seller.id, seller.zone);
    doc.users.push(seller);
    Ok(public)
}

/// Check the fields `add_seller` needs before any hashing work is done.
pub fn validate_new_seller(input: &NewSeller) -> Result<(), CrmError> {
    if input.name.trim().is_empty()
        || input.email.trim().is_empty()
        || input.password.is_empty()
    {
        return Err(CrmError::Validation(
            "Name, email and password are required".to_string(),
        ));
    }
    Ok(())
}

pub fn list_sellers(doc: &Document) -> Vec<PublicUser> {
    doc.users
        .iter()
        .filter(|u| u.is_salesman())
        .map(User::public)
        .collect()
}

pub fn update_seller(
    doc: &mut Document,
    id: Uuid,
    patch: SellerPatch,
) -> Result<PublicUser, CrmError> {
    let user = doc
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| CrmError::NotFound("User not found".to_string()))?;

    if !user.is_salesman() {
        return Err(CrmError::Validation(
            "Can only update salesmen".to_string(),
        ));
    }

    if let Some(name) = patch.name.filter(|n| !n.trim().is_empty()) {
        user.name = name.trim().to_string();
    }
    if let Some(zone) = patch.zone.filter(|z| !z.trim().is_empty()) {
        user.zone = zone.trim().to_string();
    }

    Ok(user.public())
}
