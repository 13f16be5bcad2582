use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::types::dto::common::ErrorResponse;

/// Errors for the license lifecycle endpoints
#[derive(ApiResponse, Debug)]
pub enum LicenseError {
    /// Request is malformed or violates a lifecycle rule
    #[oai(status = 400)]
    ValidationError(Json<ErrorResponse>),

    /// Session cookie absent, invalid, or expired
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Caller's role or ownership does not cover the target license
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// License or reseller does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// License username already taken
    #[oai(status = 409)]
    DuplicateUsername(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl LicenseError {
    pub fn missing_fields() -> Self {
        LicenseError::ValidationError(Json(ErrorResponse {
            error: "missing_fields".to_string(),
            message: "Username and password are required".to_string(),
            status_code: 400,
        }))
    }

    pub fn invalid_days() -> Self {
        LicenseError::ValidationError(Json(ErrorResponse {
            error: "invalid_days".to_string(),
            message: "Invalid days".to_string(),
            status_code: 400,
        }))
    }

    pub fn invalid_expires_at() -> Self {
        LicenseError::ValidationError(Json(ErrorResponse {
            error: "invalid_expires_at".to_string(),
            message: "Invalid expiresAt".to_string(),
            status_code: 400,
        }))
    }

    pub fn not_enough_credits() -> Self {
        LicenseError::ValidationError(Json(ErrorResponse {
            error: "not_enough_credits".to_string(),
            message: "Not enough credits".to_string(),
            status_code: 400,
        }))
    }

    pub fn invalid_field() -> Self {
        LicenseError::ValidationError(Json(ErrorResponse {
            error: "invalid_field".to_string(),
            message: "Invalid field".to_string(),
            status_code: 400,
        }))
    }

    pub fn unauthorized() -> Self {
        LicenseError::Unauthorized(Json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: "Unauthorized".to_string(),
            status_code: 401,
        }))
    }

    pub fn forbidden() -> Self {
        LicenseError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: "Forbidden".to_string(),
            status_code: 403,
        }))
    }

    pub fn license_not_found() -> Self {
        LicenseError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: "License not found".to_string(),
            status_code: 404,
        }))
    }

    pub fn reseller_not_found() -> Self {
        LicenseError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: "Reseller not found".to_string(),
            status_code: 404,
        }))
    }

    pub fn duplicate_username() -> Self {
        LicenseError::DuplicateUsername(Json(ErrorResponse {
            error: "duplicate_username".to_string(),
            message: "Username already taken".to_string(),
            status_code: 409,
        }))
    }

    pub fn internal_error(message: String) -> Self {
        LicenseError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message,
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            LicenseError::ValidationError(json) => json.0.message.clone(),
            LicenseError::Unauthorized(json) => json.0.message.clone(),
            LicenseError::Forbidden(json) => json.0.message.clone(),
            LicenseError::NotFound(json) => json.0.message.clone(),
            LicenseError::DuplicateUsername(json) => json.0.message.clone(),
            LicenseError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for LicenseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
