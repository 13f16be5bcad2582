use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;
use crate::types::dto::license::LicenseDto;

/// A reseller row as listed for admins
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ResellerDto {
    pub id: i32,
    pub username: String,

    /// Current credit balance
    pub credits: i32,

    pub created_at: i64,

    /// Number of licenses owned by this reseller
    pub license_count: i64,
}

impl ResellerDto {
    pub fn from_model(model: user::Model, license_count: i64) -> Self {
        Self {
            id: model.id,
            username: model.username,
            credits: model.credits,
            created_at: model.created_at,
            license_count,
        }
    }
}

/// Reseller detail including owned licenses (`GET /resellers/:id`)
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ResellerDetailResponse {
    pub id: i32,
    pub username: String,
    pub credits: i32,
    pub created_at: i64,
    pub licenses: Vec<LicenseDto>,
}

/// Request model for reseller creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateResellerRequest {
    pub username: String,
    pub password: String,

    /// Starting credit balance, defaults to 0
    pub credits: Option<i32>,
}

/// Request model for the admin credit override (`PATCH /resellers/:id`)
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SetCreditsRequest {
    /// Replacement balance; no delta, no audit trail
    pub credits: i32,
}

/// Request model for collection-level reseller delete
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DeleteResellerRequest {
    pub id: i32,
}

/// Request model for `POST /resellers/pauseAll`
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PauseAllRequest {
    pub reseller_id: i32,

    /// true pauses every owned license, false unpauses
    pub pause: bool,
}

/// Response model for `POST /resellers/pauseAll`
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PauseAllResponse {
    pub success: bool,

    /// Number of licenses affected by the batch write
    pub updated_count: u64,

    pub message: String,
}

/// Request model for the bulk action form of `POST /resellers/:id/licenses`
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct BulkActionRequest {
    /// Only "pauseAll" is recognized
    pub action: String,

    /// Desired paused state, defaults to false
    pub paused: Option<bool>,
}

/// Response model for the bulk action form of `POST /resellers/:id/licenses`
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct BulkActionResponse {
    pub success: bool,
    pub count: u64,
}
