pub mod attendance_model;
pub mod auth_model;
pub mod lead_model;
pub mod user_model;
