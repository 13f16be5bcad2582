// Stores layer - Data access and business rules over the database
pub mod admin_store;
pub mod license_store;
pub mod reseller_store;

pub use admin_store::AdminStore;
pub use license_store::LicenseStore;
pub use reseller_store::ResellerStore;
