// Database entities - SeaORM models
pub mod admin;
pub mod license;
pub mod user;
