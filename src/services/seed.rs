//! Demo data for local development.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::error::CrmError;
use crate::models::lead_model::Lead;
use crate::models::user_model::{Role, User};
use crate::store::Document;
use crate::utils::auth::hash_password;

pub const DEMO_PASSWORD: &str = "password123";

const COMPANIES: &[&str] = &[
    "Alpha Corp",
    "Beta Industries",
    "Gamma Solutions",
    "Delta Tech",
    "Epsilon Enterprises",
    "Zeta Global",
];
const PRODUCTS: &[&str] = &[
    "Industrial Pump",
    "Solar Panel",
    "Cotton Yarn",
    "Steel Rods",
    "Chemical Solvent",
    "Packaging Machine",
];
const CITIES: &[&str] = &[
    "Mumbai",
    "Delhi",
    "Bangalore",
    "Chennai",
    "Kolkata",
    "Ahmedabad",
    "Pune",
    "Surat",
];
const NAMES: &[&str] = &[
    "Rahul Kumar",
    "Amit Shah",
    "Priya Patel",
    "Sneha Gupta",
    "Vikram Singh",
    "Anjali Sharma",
];

/// A fresh document with one admin and three zoned salespeople, all using
/// [`DEMO_PASSWORD`].
pub fn demo_document() -> Result<Document, CrmError> {
    let password = hash_password(DEMO_PASSWORD)?;

    let account = |name: &str, email: &str, role: Role, zone: &str| User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        password: password.clone(),
        role,
        zone: zone.to_string(),
    };

    Ok(Document {
        users: vec![
            account("Admin User", "admin@crm.com", Role::Admin, "Global"),
            account("Salesman A", "salesA@crm.com", Role::Salesman, "Zone A"),
            account("Salesman B", "salesB@crm.com", Role::Salesman, "Zone B"),
            account("Salesman C", "salesC@crm.com", Role::Salesman, "Zone C"),
        ],
        leads: Vec::new(),
        attendance: Vec::new(),
    })
}

fn pick<R: Rng>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

/// Append three or four dummy enquiries per salesperson, each assigned to
/// them in their own zone. Returns how many leads were added.
pub fn add_dummy_leads<R: Rng>(doc: &mut Document, rng: &mut R) -> usize {
    let salespeople: Vec<User> = doc.users.iter().filter(|u| u.is_salesman()).cloned().collect();
    log::info!("Found {} salesmen", salespeople.len());

    let mut added = 0;
    for salesman in &salespeople {
        let count = rng.gen_range(3..=4);
        for _ in 0..count {
            let company = pick(rng, COMPANIES);
            let product = pick(rng, PRODUCTS);
            let city = pick(rng, CITIES);
            let name = pick(rng, NAMES);

            doc.leads.push(Lead {
                id: Uuid::new_v4(),
                sender_name: name.to_string(),
                sender_mobile: format!("98{}", rng.gen_range(0..100_000_000)),
                sender_email: format!(
                    "{}@{}.com",
                    name.to_lowercase().replacen(' ', ".", 1),
                    company.to_lowercase().replacen(' ', "", 1)
                ),
                sender_company: company.to_string(),
                sender_address: format!("{} Industrial Estate", rng.gen_range(0..100)),
                sender_city: city.to_string(),
                sender_state: "State".to_string(),
                sender_country: "India".to_string(),
                sender_pincode: format!("4000{}", rng.gen_range(0..90)),
                query_product_name: product.to_string(),
                query_message: format!("Interested in buying {}. Please send details.", product),
                query_quantity: rng.gen_range(10..110).to_string(),
                query_unit: "Units".to_string(),
                query_budget: "Not Specified".to_string(),
                enq_source: "IndiaMART".to_string(),
                zone: salesman.zone.clone(),
                assigned_to: Some(salesman.id),
                status: "New".to_string(),
                notes: None,
                created_at: Some(Utc::now()),
                photo_url: String::new(),
            });
            added += 1;
        }
    }
    added
}
