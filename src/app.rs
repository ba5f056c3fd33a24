use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpServer};

use crate::config::AppConfig;
use crate::error::CrmError;
use crate::handlers::{admin_handler, auth_handler, dashboard_handler, lead_handler};
use crate::services::assignment::{build_strategy, AssignmentStrategy};
use crate::store::JsonStore;
use crate::upload_handlers::rest::serve_upload;
use crate::upload_handlers::storage::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    pub uploads: Arc<UploadStore>,
    pub strategy: Arc<dyn AssignmentStrategy>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Result<Self, CrmError> {
        Ok(Self {
            store: Arc::new(JsonStore::new(config.db_path.clone())),
            uploads: Arc::new(UploadStore::new(config.upload_dir.clone())?),
            strategy: build_strategy(config.assignment_strategy),
            config: Arc::new(config),
        })
    }
}

#[get("/")]
async fn index() -> &'static str {
    "CRM Server is Running (JSON DB Mode)"
}

/// Register every route. Shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| CrmError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_, _| CrmError::NotFound("Not found".to_string()).into()),
    )
    .service(index)
    .service(serve_upload)
    .service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .service(auth_handler::login)
                    .service(auth_handler::me),
            )
            .service(
                web::scope("/dashboard")
                    .service(dashboard_handler::admin_stats)
                    .service(dashboard_handler::employee_stats),
            )
            .service(lead_handler::get_leads)
            .service(lead_handler::create_lead_json)
            .service(lead_handler::create_lead_form)
            .service(lead_handler::update_lead)
            .service(admin_handler::add_seller)
            .service(admin_handler::get_sellers)
            .service(admin_handler::update_seller),
    );
}

pub async fn serve(config: AppConfig) -> std::io::Result<()> {
    let bind = config.bind_addr();
    let state = AppState::from_config(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!(
        "Server running on {}:{} (db {})",
        bind.0,
        bind.1,
        state.store.path().display()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}
