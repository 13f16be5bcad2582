// Data transfer objects - request/response bodies
pub mod auth;
pub mod common;
pub mod license;
pub mod reseller;
