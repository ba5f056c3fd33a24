//! Lead intake, listing and the status/notes lifecycle.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::StatusPolicy;
use crate::error::CrmError;
use crate::models::lead_model::{HydratedLead, Lead, LeadPatch, LeadStatus, NewLead};
use crate::models::user_model::User;
use crate::services::assignment::{assign, AssignmentStrategy};
use crate::store::Document;
use crate::utils::auth::AuthUser;

pub const DEFAULT_SOURCE: &str = "Manual";
pub const UNASSIGNED: &str = "Unassigned";
pub const INITIAL_STATUS: &str = "New";

/// True when some existing lead shares the non-empty `email` or the
/// non-empty `mobile`.
pub fn is_duplicate(email: &str, mobile: &str, leads: &[Lead]) -> bool {
    leads.iter().any(|l| {
        (!email.is_empty() && l.sender_email == email)
            || (!mobile.is_empty() && l.sender_mobile == mobile)
    })
}

fn field(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Validate, deduplicate and assign a new lead, then append it to `doc`.
/// On error `doc` is left untouched.
pub fn create_lead(
    doc: &mut Document,
    input: NewLead,
    photo_url: Option<String>,
    strategy: &dyn AssignmentStrategy,
    now: DateTime<Utc>,
) -> Result<Lead, CrmError> {
    let sender_email = field(input.sender_email);
    let sender_mobile = field(input.sender_mobile);

    if sender_email.is_empty() && sender_mobile.is_empty() {
        return Err(CrmError::Validation(
            "Sender email or mobile number must be provided".to_string(),
        ));
    }

    if is_duplicate(&sender_email, &sender_mobile, &doc.leads) {
        return Err(CrmError::Validation(
            "Lead with this email or mobile already exists".to_string(),
        ));
    }

    let zone = field(input.zone);
    let assigned_to = assign(&zone, &doc.users, strategy);

    let enq_source = field(input.enq_source);
    let lead = Lead {
        id: Uuid::new_v4(),
        sender_name: field(input.sender_name),
        sender_mobile,
        sender_email,
        sender_company: field(input.sender_company),
        sender_address: field(input.sender_address),
        sender_city: field(input.sender_city),
        sender_state: field(input.sender_state),
        sender_country: field(input.sender_country),
        sender_pincode: field(input.sender_pincode),
        query_product_name: field(input.query_product_name),
        query_message: field(input.query_message),
        query_quantity: field(input.query_quantity),
        query_unit: field(input.query_unit),
        query_budget: field(input.query_budget),
        enq_source: if enq_source.is_empty() {
            DEFAULT_SOURCE.to_string()
        } else {
            enq_source
        },
        zone: if zone.is_empty() {
            UNASSIGNED.to_string()
        } else {
            zone
        },
        assigned_to,
        status: INITIAL_STATUS.to_string(),
        notes: None,
        created_at: Some(now),
        photo_url: photo_url.unwrap_or_default(),
    };

    match assigned_to {
        Some(id) => log::info!("Lead {} created, assigned to {}", lead.id, id),
        None => log::warn!("Lead {} created with no salesperson available", lead.id),
    }

    doc.leads.push(lead.clone());
    Ok(lead)
}

/// Attach the assignee's name, or "Unassigned".
pub fn hydrate(lead: Lead, users: &[User]) -> HydratedLead {
    let assigned_to_name = lead
        .assigned_to
        .and_then(|id| users.iter().find(|u| u.id == id))
        .map(|u| u.name.clone())
        .unwrap_or_else(|| UNASSIGNED.to_string());
    HydratedLead {
        lead,
        assigned_to_name,
    }
}

/// Leads visible to `actor`: all of them for an admin, only their own for
/// a salesperson.
pub fn visible_leads(doc: &Document, actor: &AuthUser) -> Vec<HydratedLead> {
    doc.leads
        .iter()
        .filter(|l| actor.is_admin() || l.assigned_to == Some(actor.id))
        .cloned()
        .map(|l| hydrate(l, &doc.users))
        .collect()
}

/// Apply a status/notes patch. Only an admin or the lead's assignee may do
/// so; anyone else gets `Forbidden` and the lead is unchanged.
pub fn update_lead(
    doc: &mut Document,
    lead_id: Uuid,
    patch: LeadPatch,
    actor: &AuthUser,
    policy: StatusPolicy,
) -> Result<Lead, CrmError> {
    let lead = doc
        .leads
        .iter_mut()
        .find(|l| l.id == lead_id)
        .ok_or_else(|| CrmError::NotFound("Lead not found".to_string()))?;

    if !actor.is_admin() && lead.assigned_to != Some(actor.id) {
        return Err(CrmError::Forbidden("Not authorized".to_string()));
    }

    let status = match patch.status {
        Some(s) if !s.trim().is_empty() => Some(normalize_status(&s, policy)?),
        _ => None,
    };

    if let Some(status) = status {
        lead.status = status;
    }
    if let Some(notes) = patch.notes {
        lead.notes = notes;
    }

    log::info!(
        "Lead {} updated by {} (status {:?})",
        lead.id,
        actor.id,
        lead.status
    );
    Ok(lead.clone())
}

fn normalize_status(value: &str, policy: StatusPolicy) -> Result<String, CrmError> {
    match policy {
        StatusPolicy::Permissive => Ok(value.to_string()),
        StatusPolicy::Strict => LeadStatus::parse(value)
            .map(|s| s.label().to_string())
            .ok_or_else(|| CrmError::Validation(format!("Unknown lead status: {}", value))),
    }
}
