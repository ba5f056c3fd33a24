//! Server configuration loaded from environment variables (and `.env`).
//!
//! Every setting has a default so the server starts with zero configuration
//! for local development.

use std::fmt;
use std::path::PathBuf;

/// Which salesperson-selection policy lead intake uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Independent uniform draw per lead.
    Random,
    /// Rotate through candidates in order.
    RoundRobin,
}

/// How lead status updates are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Any non-empty string is stored as-is.
    Permissive,
    /// Only known status labels are accepted.
    Strict,
}

#[derive(Clone)]
pub struct AppConfig {
    /// Env: `HOST`. Default: `0.0.0.0`
    pub host: String,

    /// Env: `PORT`. Default: `5000`
    pub port: u16,

    /// Path of the JSON document holding users, leads and attendance.
    /// Env: `DB_PATH`. Default: `data/db.json`
    pub db_path: PathBuf,

    /// Directory receiving uploaded visiting cards.
    /// Env: `UPLOAD_DIR`. Default: `uploads`
    pub upload_dir: PathBuf,

    /// HMAC secret for session tokens.
    /// Env: `JWT_SECRET`. Default: `secret` (development only).
    pub jwt_secret: String,

    /// Env: `TOKEN_TTL_HOURS`. Default: `24`
    pub token_ttl_hours: i64,

    /// Env: `ASSIGNMENT_STRATEGY` (`random` | `round-robin`). Default: `random`
    pub assignment_strategy: StrategyKind,

    /// Env: `LEAD_STATUS_POLICY` (`permissive` | `strict`). Default: `permissive`
    pub status_policy: StatusPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            db_path: PathBuf::from("data/db.json"),
            upload_dir: PathBuf::from("uploads"),
            jwt_secret: "secret".to_string(),
            token_ttl_hours: 24,
            assignment_strategy: StrategyKind::Random,
            status_policy: StatusPolicy::Permissive,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_path", &self.db_path)
            .field("upload_dir", &self.upload_dir)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("assignment_strategy", &self.assignment_strategy)
            .field("status_policy", &self.status_policy)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }

        if let Some(port) = lookup("PORT") {
            match port.parse::<u16>() {
                Ok(p) => config.port = p,
                Err(_) => log::warn!("Invalid PORT {:?}, using {}", port, config.port),
            }
        }

        if let Some(path) = lookup("DB_PATH") {
            config.db_path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }

        match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => config.jwt_secret = secret,
            _ => log::warn!("JWT_SECRET not set, using the development default"),
        }

        if let Some(ttl) = lookup("TOKEN_TTL_HOURS") {
            match ttl.parse::<i64>() {
                Ok(h) if h > 0 => config.token_ttl_hours = h,
                _ => log::warn!(
                    "Invalid TOKEN_TTL_HOURS {:?}, using {}",
                    ttl,
                    config.token_ttl_hours
                ),
            }
        }

        if let Some(kind) = lookup("ASSIGNMENT_STRATEGY") {
            match parse_strategy(&kind) {
                Some(k) => config.assignment_strategy = k,
                None => log::warn!("Unknown ASSIGNMENT_STRATEGY {:?}, using random", kind),
            }
        }

        if let Some(policy) = lookup("LEAD_STATUS_POLICY") {
            match parse_status_policy(&policy) {
                Some(p) => config.status_policy = p,
                None => log::warn!("Unknown LEAD_STATUS_POLICY {:?}, using permissive", policy),
            }
        }

        config
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_strategy(value: &str) -> Option<StrategyKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "random" | "uniform" => Some(StrategyKind::Random),
        "round-robin" | "round_robin" | "roundrobin" => Some(StrategyKind::RoundRobin),
        _ => None,
    }
}

fn parse_status_policy(value: &str) -> Option<StatusPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "permissive" => Some(StatusPolicy::Permissive),
        "strict" => Some(StatusPolicy::Strict),
        _ => None,
    }
}
