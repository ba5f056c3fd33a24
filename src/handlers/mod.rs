pub mod admin_handler;
pub mod auth_handler;
pub mod dashboard_handler;
pub mod lead_handler;
