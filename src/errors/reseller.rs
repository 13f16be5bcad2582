use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::types::dto::common::ErrorResponse;

/// Errors for the reseller management endpoints (admin surface)
#[derive(ApiResponse, Debug)]
pub enum ResellerError {
    /// Request is missing required fields or names an unknown action
    #[oai(status = 400)]
    ValidationError(Json<ErrorResponse>),

    /// Session cookie absent, invalid, or expired
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Caller lacks the admin role (or ownership for scoped reads)
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Reseller does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Reseller username already taken
    #[oai(status = 409)]
    DuplicateUsername(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl ResellerError {
    pub fn missing_fields() -> Self {
        ResellerError::ValidationError(Json(ErrorResponse {
            error: "missing_fields".to_string(),
            message: "Username and password required".to_string(),
            status_code: 400,
        }))
    }

    pub fn invalid_credits() -> Self {
        ResellerError::ValidationError(Json(ErrorResponse {
            error: "invalid_credits".to_string(),
            message: "Invalid credits".to_string(),
            status_code: 400,
        }))
    }

    pub fn invalid_action() -> Self {
        ResellerError::ValidationError(Json(ErrorResponse {
            error: "invalid_action".to_string(),
            message: "Invalid action".to_string(),
            status_code: 400,
        }))
    }

    pub fn unauthorized() -> Self {
        ResellerError::Unauthorized(Json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: "Unauthorized".to_string(),
            status_code: 401,
        }))
    }

    pub fn forbidden() -> Self {
        ResellerError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: "Forbidden".to_string(),
            status_code: 403,
        }))
    }

    pub fn not_found() -> Self {
        ResellerError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: "Reseller not found".to_string(),
            status_code: 404,
        }))
    }

    pub fn duplicate_username() -> Self {
        ResellerError::DuplicateUsername(Json(ErrorResponse {
            error: "duplicate_username".to_string(),
            message: "Username already taken".to_string(),
            status_code: 409,
        }))
    }

    pub fn internal_error(message: String) -> Self {
        ResellerError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message,
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            ResellerError::ValidationError(json) => json.0.message.clone(),
            ResellerError::Unauthorized(json) => json.0.message.clone(),
            ResellerError::Forbidden(json) => json.0.message.clone(),
            ResellerError::NotFound(json) => json.0.message.clone(),
            ResellerError::DuplicateUsername(json) => json.0.message.clone(),
            ResellerError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for ResellerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
