use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::types::dto::common::ErrorResponse;

/// Errors for the unauthenticated endpoints: license activation and
/// admin/reseller session login
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Username or password missing from the request
    #[oai(status = 400)]
    MissingCredentials(Json<ErrorResponse>),

    /// Unknown username or wrong password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// License has been revoked by its issuer
    #[oai(status = 403)]
    LicenseRevoked(Json<ErrorResponse>),

    /// License is temporarily paused
    #[oai(status = 403)]
    LicensePaused(Json<ErrorResponse>),

    /// License expiry timestamp is in the past
    #[oai(status = 403)]
    LicenseExpired(Json<ErrorResponse>),

    /// No HWID bound yet and none supplied
    #[oai(status = 400)]
    HwidRequired(Json<ErrorResponse>),

    /// Supplied HWID does not match the bound device
    #[oai(status = 403)]
    HwidMismatch(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    pub fn missing_credentials() -> Self {
        AuthError::MissingCredentials(Json(ErrorResponse {
            error: "missing_credentials".to_string(),
            message: "Username and password required".to_string(),
            status_code: 400,
        }))
    }

    /// Missing email/username on the session login endpoint
    pub fn missing_login_identity() -> Self {
        AuthError::MissingCredentials(Json(ErrorResponse {
            error: "missing_credentials".to_string(),
            message: "Missing credentials".to_string(),
            status_code: 400,
        }))
    }

    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid username or password".to_string(),
            status_code: 401,
        }))
    }

    pub fn invalid_admin_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid admin credentials".to_string(),
            status_code: 401,
        }))
    }

    pub fn invalid_reseller_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid reseller credentials".to_string(),
            status_code: 401,
        }))
    }

    pub fn license_revoked() -> Self {
        AuthError::LicenseRevoked(Json(ErrorResponse {
            error: "license_revoked".to_string(),
            message: "License revoked".to_string(),
            status_code: 403,
        }))
    }

    pub fn license_paused() -> Self {
        AuthError::LicensePaused(Json(ErrorResponse {
            error: "license_paused".to_string(),
            message: "License paused".to_string(),
            status_code: 403,
        }))
    }

    pub fn license_expired() -> Self {
        AuthError::LicenseExpired(Json(ErrorResponse {
            error: "license_expired".to_string(),
            message: "License expired".to_string(),
            status_code: 403,
        }))
    }

    pub fn hwid_required() -> Self {
        AuthError::HwidRequired(Json(ErrorResponse {
            error: "hwid_required".to_string(),
            message: "HWID required".to_string(),
            status_code: 400,
        }))
    }

    pub fn hwid_mismatch() -> Self {
        AuthError::HwidMismatch(Json(ErrorResponse {
            error: "hwid_mismatch".to_string(),
            message: "License already in use on another device".to_string(),
            status_code: 403,
        }))
    }

    pub fn internal_error(message: String) -> Self {
        AuthError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message,
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::MissingCredentials(json) => json.0.message.clone(),
            AuthError::InvalidCredentials(json) => json.0.message.clone(),
            AuthError::LicenseRevoked(json) => json.0.message.clone(),
            AuthError::LicensePaused(json) => json.0.message.clone(),
            AuthError::LicenseExpired(json) => json.0.message.clone(),
            AuthError::HwidRequired(json) => json.0.message.clone(),
            AuthError::HwidMismatch(json) => json.0.message.clone(),
            AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
