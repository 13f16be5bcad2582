// API layer - HTTP endpoints
pub mod auth;
pub mod health;
pub mod licenses;
pub mod resellers;

pub use auth::AuthApi;
pub use health::HealthApi;
pub use licenses::LicenseApi;
pub use resellers::ResellerApi;

use poem_openapi::auth::ApiKey;
use poem_openapi::SecurityScheme;

/// Session cookie authentication. The `token` cookie carries the JWT
/// issued by the login endpoint.
#[derive(SecurityScheme)]
#[oai(ty = "api_key", key_name = "token", key_in = "cookie")]
pub struct SessionAuth(pub ApiKey);
