// Errors layer - Error type definitions
pub mod auth;
pub mod license;
pub mod reseller;

// Re-exports for convenience
pub use auth::AuthError;
pub use license::LicenseError;
pub use reseller::ResellerError;
