//! Shared fixtures for handler tests.

use std::sync::Arc;

use tempfile::TempDir;
use uuid::Uuid;

use crate::app::AppState;
use crate::config::AppConfig;
use crate::models::user_model::{Role, User};
use crate::services::assignment::RoundRobin;
use crate::store::{Document, JsonStore};
use crate::upload_handlers::storage::UploadStore;
use crate::utils::auth::generate_jwt;

pub const PASSWORD: &str = "password123";
pub const SECRET: &str = "test-secret";

pub struct Fixture {
    pub state: AppState,
    pub admin: User,
    pub sales_a: User,
    pub sales_b: User,
    _dir: TempDir,
}

fn account(name: &str, email: &str, role: Role, zone: &str, hash: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        password: hash.to_string(),
        role,
        zone: zone.to_string(),
    }
}

/// An app state over a temp directory holding one admin and two
/// salespeople (Zone A, Zone B). Assignment is round-robin so tests are
/// deterministic.
pub async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let config = AppConfig {
        db_path: dir.path().join("db.json"),
        upload_dir: dir.path().join("uploads"),
        jwt_secret: SECRET.to_string(),
        ..AppConfig::default()
    };

    // Low-cost bcrypt keeps the fixture fast.
    let hash = bcrypt::hash(PASSWORD, 4).unwrap();
    let admin = account("Admin User", "admin@crm.com", Role::Admin, "Global", &hash);
    let sales_a = account("Salesman A", "salesA@crm.com", Role::Salesman, "Zone A", &hash);
    let sales_b = account("Salesman B", "salesB@crm.com", Role::Salesman, "Zone B", &hash);

    let store = JsonStore::new(config.db_path.clone());
    store
        .save(&Document {
            users: vec![admin.clone(), sales_a.clone(), sales_b.clone()],
            ..Default::default()
        })
        .await
        .unwrap();

    let state = AppState {
        store: Arc::new(store),
        uploads: Arc::new(UploadStore::new(config.upload_dir.clone()).unwrap()),
        strategy: Arc::new(RoundRobin::default()),
        config: Arc::new(config),
    };

    Fixture {
        state,
        admin,
        sales_a,
        sales_b,
        _dir: dir,
    }
}

impl Fixture {
    /// `Authorization` header value for `user`.
    pub fn bearer(&self, user: &User) -> String {
        let token = generate_jwt(&user.id, user.role, SECRET, 24).unwrap();
        format!("Bearer {}", token)
    }
}

/// Initialise the full route table over a fixture's state.
macro_rules! test_app {
    ($fx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($fx.state.clone()))
                .configure(crate::app::configure),
        )
        .await
    };
}
pub(crate) use test_app;

/// Hand-built multipart/form-data body. Returns the content type and bytes.
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let boundary = "crm-test-boundary";
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            )
            .as_bytes(),
        );
    }

    if let Some((name, file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                boundary, name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    (format!("multipart/form-data; boundary={}", boundary), body)
}
