use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// An inbound enquiry and its sales state.
///
/// Records written by older deployments may lack most contact fields, and
/// JSON clients sometimes stored quantities or phone numbers as numbers.
/// Every text field therefore defaults to empty and accepts any scalar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,

    #[serde(default, deserialize_with = "lenient_text")]
    pub sender_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sender_mobile: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sender_email: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sender_company: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sender_address: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sender_city: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sender_state: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sender_country: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sender_pincode: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub query_product_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub query_message: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub query_quantity: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub query_unit: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub query_budget: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub enq_source: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub zone: String,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub photo_url: String,
}

/// Lead intake payload, from a JSON body or the text fields of a
/// multipart form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender_mobile: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender_company: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender_city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender_state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender_country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender_pincode: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub query_product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub query_message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub query_quantity: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub query_unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub query_budget: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub enq_source: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub zone: Option<String>,
}

/// Accepts strings, numbers and booleans alike; form clients are not
/// consistent about quoting quantities and pincodes.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// The only mutable part of a lead after intake.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadPatch {
    pub status: Option<String>,
    /// `Some(None)` when the body sends `"notes": null`, which clears them.
    #[serde(default, deserialize_with = "present_notes")]
    pub notes: Option<Option<String>>,
}

fn present_notes<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(lenient_string(deserializer)?))
}

/// A lead with its assignee's display name attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydratedLead {
    #[serde(flatten)]
    pub lead: Lead,
    pub assigned_to_name: String,
}

/// Every status label either vocabulary has used.
///
/// `New`, `Contacted`, `Interested`, `Converted` and `Lost` are current;
/// `In Progress` and `Closed` come from earlier data and are still
/// understood so old records count correctly on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadStatus {
    New,
    Contacted,
    Interested,
    Converted,
    Lost,
    InProgress,
    Closed,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Interested,
        LeadStatus::Converted,
        LeadStatus::Lost,
        LeadStatus::InProgress,
        LeadStatus::Closed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Interested => "Interested",
            LeadStatus::Converted => "Converted",
            LeadStatus::Lost => "Lost",
            LeadStatus::InProgress => "In Progress",
            LeadStatus::Closed => "Closed",
        }
    }

    /// Case-insensitive match against the known labels.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.label().eq_ignore_ascii_case(value))
    }

    /// The deal closed in our favour.
    pub fn is_won(&self) -> bool {
        matches!(self, LeadStatus::Converted | LeadStatus::Closed)
    }

    /// Still being worked; counts toward follow-ups.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            LeadStatus::Contacted | LeadStatus::Interested | LeadStatus::InProgress
        )
    }
}
