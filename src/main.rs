use clap::{Parser, Subcommand};
use dotenv::dotenv;

use lead_crm::app;
use lead_crm::config::AppConfig;
use lead_crm::services::seed;
use lead_crm::store::JsonStore;

#[derive(Parser, Debug)]
#[command(name = "lead-crm", version, about = "Lead management CRM server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Overwrite the database with the demo admin and salesmen
    Seed,
    /// Append a few dummy leads for every salesman
    SeedLeads,
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    log::debug!("{:?}", config);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => app::serve(config).await?,
        Command::Seed => {
            let store = JsonStore::new(config.db_path.clone());
            store.save(&seed::demo_document()?).await?;
            log::info!("Data seeded into {}", store.path().display());
        }
        Command::SeedLeads => {
            let store = JsonStore::new(config.db_path.clone());
            let mut doc = store.try_load().await?;
            let added = seed::add_dummy_leads(&mut doc, &mut rand::thread_rng());
            store.save(&doc).await?;
            log::info!("Added {} dummy leads", added);
        }
    }

    Ok(())
}
