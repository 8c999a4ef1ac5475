use std::process::ExitCode;

use tracing::{error, info};

use caixa_preta::file::LocalObjectStore;
use caixa_preta::web::WebServer;
use caixa_preta::{Config, Database};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = caixa_preta::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        caixa_preta::logging::init_console_only(&config.logging.level);
    }

    info!("Caixa-Preta - personal file box");

    if let Err(e) = config.validate() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = match LocalObjectStore::new(
        &config.storage.path,
        &config.storage.public_base_url,
        &config.storage.signing_secret,
    ) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize object storage: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Object storage initialized at: {}", config.storage.path);

    let server = match WebServer::new(&config, db, store) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
