use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::Database;
use tracing::{info, warn};

use keygate_backend::api::{AuthApi, HealthApi, LicenseApi, ResellerApi};
use keygate_backend::config::{init_logging, AppConfig};
use keygate_backend::services::TokenService;
use keygate_backend::stores::{AdminStore, LicenseStore, ResellerStore};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let config = AppConfig::from_env().expect("Invalid configuration");

    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    info!(database_url = %config.database_url, "Connected to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    info!("Database migrations completed");

    let token_service = Arc::new(TokenService::new(config.jwt_secret.clone()));
    let admin_store = Arc::new(AdminStore::new(db.clone(), config.password_pepper.clone()));
    let reseller_store = Arc::new(ResellerStore::new(
        db.clone(),
        config.password_pepper.clone(),
    ));
    let license_store = Arc::new(LicenseStore::new(db.clone(), config.password_pepper.clone()));

    // Seed the admin account when configured; an existing account is
    // never overwritten
    match (&config.admin_email, &config.admin_password) {
        (Some(email), Some(password)) => {
            match admin_store.seed_admin(email, password).await {
                Ok(true) => info!(email = %email, "Seeded admin account"),
                Ok(false) => info!(email = %email, "Admin account already exists"),
                Err(e) => warn!(error = %e, "Failed to seed admin account"),
            }
        }
        _ => warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin seed"),
    }

    let auth_api = AuthApi::new(
        license_store.clone(),
        admin_store.clone(),
        reseller_store.clone(),
        token_service.clone(),
    );
    let license_api = LicenseApi::new(
        license_store.clone(),
        reseller_store.clone(),
        token_service.clone(),
    );
    let reseller_api = ResellerApi::new(
        reseller_store.clone(),
        license_store.clone(),
        token_service.clone(),
    );

    let api_service = OpenApiService::new(
        (HealthApi, auth_api, license_api, reseller_api),
        "License Portal API",
        "1.0.0",
    )
    .server("http://localhost:3000/api");

    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    info!(bind_addr = %config.bind_addr, "Starting server");
    info!("Swagger UI available at /swagger, API at /api");

    Server::new(TcpListener::bind(config.bind_addr.clone()))
        .run(app)
        .await
}
