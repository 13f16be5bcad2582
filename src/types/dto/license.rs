use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

use crate::types::db::license;
use crate::types::internal::{LicenseFlag, LicenseUpdateOp};

/// A license as exposed to admins and resellers. The password hash never
/// leaves the store.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LicenseDto {
    /// License id
    pub id: i32,

    /// Credential identifier, globally unique
    pub username: String,

    /// Bound device fingerprint, null until first activation
    pub hwid: Option<String>,

    /// Expiry as Unix timestamp; null means never expires
    pub expires_at: Option<i64>,

    /// Cached expiry marker, written by the first post-expiry activation
    pub expired: bool,

    pub paused: bool,
    pub revoked: bool,

    /// Display name of the creating principal
    pub created_by: String,

    /// Owning reseller id, null for admin-created licenses
    pub user_id: Option<i32>,

    /// Creation time (Unix timestamp)
    pub created_at: i64,
}

impl From<license::Model> for LicenseDto {
    fn from(model: license::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            hwid: model.hwid,
            expires_at: model.expires_at,
            expired: model.expired,
            paused: model.paused,
            revoked: model.revoked,
            created_by: model.created_by,
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }
}

/// Request model for license creation. `days` and `expires_at` are
/// mutually exclusive; `days` wins when both are present.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateLicenseRequest {
    /// Credential identifier, must be globally unique
    pub username: String,

    /// License password
    pub password: String,

    /// License duration in whole days; must be positive. Costs one credit
    /// per day when issued by a reseller.
    pub days: Option<i32>,

    /// Absolute expiry (RFC 3339). Free for resellers; ignored when
    /// `days` is present.
    pub expires_at: Option<String>,
}

/// Update action selector
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub enum LicenseAction {
    /// Set a status flag to an explicit value
    Set,
    /// Flip a status flag
    Toggle,
    /// Clear the bound HWID
    ResetHwid,
}

/// Status flags addressable by update requests
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub enum LicenseFlagField {
    Paused,
    Revoked,
    Expired,
}

impl From<LicenseFlagField> for LicenseFlag {
    fn from(field: LicenseFlagField) -> Self {
        match field {
            LicenseFlagField::Paused => LicenseFlag::Paused,
            LicenseFlagField::Revoked => LicenseFlag::Revoked,
            LicenseFlagField::Expired => LicenseFlag::Expired,
        }
    }
}

/// Request model for per-license update (`PATCH /licenses/:id`)
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateLicenseRequest {
    /// What to do
    pub action: LicenseAction,

    /// Target flag; required for `set` and `toggle`
    pub field: Option<LicenseFlagField>,

    /// Explicit value; required for `set`
    pub value: Option<bool>,
}

impl UpdateLicenseRequest {
    /// Validate the tagged operation. Returns None when required parts
    /// are missing for the chosen action.
    pub fn to_op(&self) -> Option<LicenseUpdateOp> {
        match self.action {
            LicenseAction::Set => match (self.field, self.value) {
                (Some(field), Some(value)) => Some(LicenseUpdateOp::Set(field.into(), value)),
                _ => None,
            },
            LicenseAction::Toggle => self
                .field
                .map(|field| LicenseUpdateOp::Toggle(field.into())),
            LicenseAction::ResetHwid => Some(LicenseUpdateOp::ResetHwid),
        }
    }
}

/// Request model for collection-level update (`PATCH /licenses`)
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateLicenseByIdRequest {
    /// License id to update
    pub id: i32,

    pub action: LicenseAction,
    pub field: Option<LicenseFlagField>,
    pub value: Option<bool>,
}

impl UpdateLicenseByIdRequest {
    pub fn to_op(&self) -> Option<LicenseUpdateOp> {
        UpdateLicenseRequest {
            action: self.action,
            field: self.field,
            value: self.value,
        }
        .to_op()
    }
}

/// Request model for collection-level delete (`DELETE /licenses`)
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DeleteLicenseRequest {
    /// License id to delete
    pub id: i32,
}

/// Owning reseller summary attached to reseller-scoped license lists
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ResellerSummary {
    pub id: i32,
    pub username: String,
    pub credits: i32,
}

/// Response model for `GET /licenses`. `reseller` is present only when
/// the caller is a reseller (admins see the full table and no balance).
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LicenseListResponse {
    pub reseller: Option<ResellerSummary>,
    pub licenses: Vec<LicenseDto>,
}

/// Response model for HWID reset
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ResetHwidResponse {
    pub success: bool,
    pub license: LicenseDto,
}
