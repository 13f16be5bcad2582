// Internal types - never serialized to clients directly
pub mod auth;
pub mod license_op;

pub use auth::{Principal, SessionClaims};
pub use license_op::{LicenseFlag, LicenseUpdateOp};
