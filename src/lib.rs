//! Lead-management CRM backend.
//!
//! Inbound leads are deduplicated by contact details and routed to a
//! salesperson in the lead's zone. Users, leads and daily attendance live in
//! a single JSON document served over a small REST API.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;
pub mod upload_handlers;
pub mod utils;

#[cfg(test)]
mod test_support;
