//! Read-side statistics computed from a document snapshot on every call.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CrmError;
use crate::models::attendance_model::{STATUS_NOT_MARKED, STATUS_PRESENT};
use crate::models::lead_model::LeadStatus;
use crate::services::attendance::find_record;
use crate::store::Document;

/// Monthly lead target shown to every salesperson.
pub const DEFAULT_TARGET: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentEmployee {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub check_in_time: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsentEmployee {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_leads: usize,
    pub active_employees: usize,
    pub present_today: usize,
    pub present_employees_list: Vec<PresentEmployee>,
    pub absent_employees_list: Vec<AbsentEmployee>,
    pub performance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStats {
    pub assigned_leads_count: usize,
    pub targets: usize,
    pub achieved: usize,
    pub follow_ups_due: usize,
    pub attendance_status: String,
}

pub fn admin_stats(doc: &Document, today: NaiveDate) -> AdminStats {
    let present: Vec<_> = doc
        .attendance
        .iter()
        .filter(|a| a.date == today && a.status == STATUS_PRESENT)
        .collect();

    let present_employees_list = present
        .iter()
        .map(|record| {
            let user = doc.users.iter().find(|u| u.id == record.user_id);
            PresentEmployee {
                id: record.user_id,
                name: user.map_or_else(|| "Unknown".to_string(), |u| u.name.clone()),
                role: user.map_or_else(|| "N/A".to_string(), |u| u.role.to_string()),
                check_in_time: record
                    .timestamp
                    .with_timezone(&Local)
                    .format("%H:%M")
                    .to_string(),
                status: STATUS_PRESENT.to_string(),
            }
        })
        .collect();

    let salespeople: Vec<_> = doc.users.iter().filter(|u| u.is_salesman()).collect();

    let absent_employees_list = salespeople
        .iter()
        .filter(|u| !present.iter().any(|r| r.user_id == u.id))
        .map(|u| AbsentEmployee {
            id: u.id,
            name: u.name.clone(),
            role: u.role.to_string(),
            status: "Absent".to_string(),
        })
        .collect();

    AdminStats {
        total_leads: doc.leads.len(),
        active_employees: salespeople.len(),
        present_today: present.len(),
        present_employees_list,
        absent_employees_list,
        performance: "Good".to_string(),
    }
}

pub fn employee_stats(
    doc: &Document,
    user_id: Uuid,
    today: NaiveDate,
) -> Result<EmployeeStats, CrmError> {
    if !doc.users.iter().any(|u| u.id == user_id) {
        return Err(CrmError::NotFound("User not found".to_string()));
    }

    let mine: Vec<_> = doc
        .leads
        .iter()
        .filter(|l| l.assigned_to == Some(user_id))
        .collect();

    let statuses: Vec<LeadStatus> = mine
        .iter()
        .filter_map(|l| LeadStatus::parse(&l.status))
        .collect();

    let attendance_status = find_record(doc, user_id, today)
        .map(|a| a.status.clone())
        .unwrap_or_else(|| STATUS_NOT_MARKED.to_string());

    Ok(EmployeeStats {
        assigned_leads_count: mine.len(),
        targets: DEFAULT_TARGET,
        achieved: statuses.iter().filter(|s| s.is_won()).count(),
        follow_ups_due: statuses.iter().filter(|s| s.is_in_progress()).count(),
        attendance_status,
    })
}
