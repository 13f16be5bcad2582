// Configuration layer - environment-driven settings
pub mod logging;

use std::env;

pub use logging::init_logging;

/// Errors raised while reading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(String),
}

/// Application settings, loaded once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection string
    pub database_url: String,

    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Secret for signing session JWTs
    pub jwt_secret: String,

    /// Server-side pepper mixed into password hashes
    pub password_pepper: String,

    /// Admin account seeded at startup, if configured
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    /// Load settings from environment variables. `JWT_SECRET` and
    /// `PASSWORD_PEPPER` are required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://portal.db?mode=rwc".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVariable("JWT_SECRET".to_string()))?;
        let password_pepper = env::var("PASSWORD_PEPPER")
            .map_err(|_| ConfigError::MissingVariable("PASSWORD_PEPPER".to_string()))?;

        let admin_email = env::var("ADMIN_EMAIL").ok();
        let admin_password = env::var("ADMIN_PASSWORD").ok();

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
            password_pepper,
            admin_email,
            admin_password,
        })
    }
}
