use serde::{Deserialize, Serialize};

/// Claims carried by the `token` session cookie JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: admin email or reseller id
    pub sub: String,

    /// Principal role: "admin" or "reseller"
    pub role: String,

    /// Reseller id, absent for admins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,

    /// Reseller username, absent for admins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// An authenticated identity, passed explicitly into every protected
/// store operation. Decoded once from the session cookie per request.
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    Admin { email: String },
    Reseller { id: i32, username: String },
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin { .. })
    }

    /// Reseller id when the principal is a reseller
    pub fn reseller_id(&self) -> Option<i32> {
        match self {
            Principal::Admin { .. } => None,
            Principal::Reseller { id, .. } => Some(*id),
        }
    }

    /// Name recorded as `created_by` on licenses issued by this principal
    pub fn display_name(&self) -> &str {
        match self {
            Principal::Admin { .. } => "admin",
            Principal::Reseller { username, .. } => username,
        }
    }
}
