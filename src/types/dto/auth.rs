use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for license-holder activation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ActivateRequest {
    /// License username
    pub username: String,

    /// License password
    pub password: String,

    /// Hardware identifier of the calling device. Required on first
    /// activation; must match the bound value afterwards.
    pub hwid: Option<String>,
}

/// Response model for a successful activation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ActivateResponse {
    /// Always true on success
    pub success: bool,

    /// Human-readable confirmation
    pub message: String,
}

/// Request model for admin/reseller session login.
/// `email` selects admin login, `username` selects reseller login.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Admin email (admin login)
    pub email: Option<String>,

    /// Reseller username (reseller login)
    pub username: Option<String>,

    /// Password for either principal type
    pub password: String,
}

/// Response model for session login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Always true on success
    pub success: bool,

    /// Role of the authenticated principal ("admin" or "reseller")
    pub role: String,
}
