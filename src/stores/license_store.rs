use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::errors::auth::AuthError;
use crate::errors::license::LicenseError;
use crate::services::password;
use crate::stores::ResellerStore;
use crate::types::db::license::{self, Entity as License};
use crate::types::db::user::{self, Entity as User};
use crate::types::internal::{LicenseFlag, LicenseUpdateOp, Principal};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// LicenseStore holds the license lifecycle: activation with HWID
/// binding, creation with credit debit, tagged status updates, and
/// deletion with pro-rata refund.
pub struct LicenseStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl LicenseStore {
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    /// End-user activation (the auth gateway).
    ///
    /// Check order is fixed: credentials, revoked, paused, expired, hwid.
    /// The first failing check wins. Expiry is derived live from
    /// `expires_at`; the stored `expired` flag is only written here, once,
    /// as a sticky marker for the dashboards.
    pub async fn activate(
        &self,
        username: &str,
        license_password: &str,
        hwid: Option<&str>,
    ) -> Result<(), AuthError> {
        if username.is_empty() || license_password.is_empty() {
            return Err(AuthError::missing_credentials());
        }

        let record = License::find()
            .filter(license::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?
            .ok_or_else(AuthError::invalid_credentials)?;

        if !password::verify_password(&self.password_pepper, license_password, &record.password_hash)
        {
            return Err(AuthError::invalid_credentials());
        }

        if record.revoked {
            return Err(AuthError::license_revoked());
        }

        if record.paused {
            return Err(AuthError::license_paused());
        }

        let now = Utc::now().timestamp();
        if let Some(expires_at) = record.expires_at {
            if expires_at < now {
                if !record.expired {
                    let mut active: license::ActiveModel = record.into();
                    active.expired = Set(true);
                    active
                        .update(&self.db)
                        .await
                        .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;
                }
                return Err(AuthError::license_expired());
            }
        }

        match &record.hwid {
            None => {
                let supplied = hwid.ok_or_else(AuthError::hwid_required)?;

                // First activation binds the device
                let mut active: license::ActiveModel = record.into();
                active.hwid = Set(Some(supplied.to_string()));
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;

                Ok(())
            }
            Some(bound) => match hwid {
                Some(supplied) if supplied == bound => Ok(()),
                _ => Err(AuthError::hwid_mismatch()),
            },
        }
    }

    /// Create a license on behalf of the given principal.
    ///
    /// `days` wins over `expires_at_raw` when both are present. Reseller
    /// requesters pay one credit per day; the debit is a conditional
    /// decrement inside the same transaction as the insert, so two
    /// concurrent creations can never overspend a balance.
    pub async fn create_license(
        &self,
        username: &str,
        license_password: &str,
        days: Option<i32>,
        expires_at_raw: Option<&str>,
        principal: &Principal,
    ) -> Result<license::Model, LicenseError> {
        if username.is_empty() || license_password.is_empty() {
            return Err(LicenseError::missing_fields());
        }

        let now = Utc::now().timestamp();
        let mut duration: i32 = 0;
        let expires_at: Option<i64> = if let Some(days) = days {
            if days <= 0 {
                return Err(LicenseError::invalid_days());
            }
            duration = days;
            Some(now + days as i64 * SECONDS_PER_DAY)
        } else if let Some(raw) = expires_at_raw {
            let parsed = DateTime::parse_from_rfc3339(raw)
                .map_err(|_| LicenseError::invalid_expires_at())?;
            Some(parsed.timestamp())
        } else {
            None
        };

        let existing = License::find()
            .filter(license::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| LicenseError::internal_error(format!("Database error: {}", e)))?;

        if existing.is_some() {
            return Err(LicenseError::duplicate_username());
        }

        let password_hash = password::hash_password(&self.password_pepper, license_password)
            .map_err(|e| LicenseError::internal_error(e.to_string()))?;

        let txn = self.db.begin().await.map_err(|e| {
            LicenseError::internal_error(format!("Failed to start transaction: {}", e))
        })?;

        let (created_by, owner_id) = match principal {
            Principal::Admin { .. } => ("admin".to_string(), None),
            Principal::Reseller { id, .. } => {
                let reseller = User::find_by_id(*id)
                    .one(&txn)
                    .await
                    .map_err(|e| LicenseError::internal_error(format!("Database error: {}", e)))?
                    .ok_or_else(LicenseError::reseller_not_found)?;

                if duration > 0 {
                    let debited = ResellerStore::debit(&txn, *id, duration)
                        .await
                        .map_err(|e| LicenseError::internal_error(format!("Database error: {}", e)))?;
                    if !debited {
                        return Err(LicenseError::not_enough_credits());
                    }
                }

                (reseller.username, Some(*id))
            }
        };

        let new_license = license::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            hwid: Set(None),
            expires_at: Set(expires_at),
            expired: Set(false),
            paused: Set(false),
            revoked: Set(false),
            created_by: Set(created_by),
            user_id: Set(owner_id),
            created_at: Set(now),
        };

        let created = new_license.insert(&txn).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                LicenseError::duplicate_username()
            } else {
                LicenseError::internal_error(format!("Database error: {}", e))
            }
        })?;

        txn.commit().await.map_err(|e| {
            LicenseError::internal_error(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(created)
    }

    /// All licenses, newest first. Admin view.
    pub async fn list_all(&self) -> Result<Vec<license::Model>, LicenseError> {
        License::find()
            .order_by_desc(license::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LicenseError::internal_error(format!("Database error: {}", e)))
    }

    /// Licenses owned by one reseller, newest first
    pub async fn list_by_reseller(
        &self,
        reseller_id: i32,
    ) -> Result<Vec<license::Model>, LicenseError> {
        License::find()
            .filter(license::Column::UserId.eq(reseller_id))
            .order_by_desc(license::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LicenseError::internal_error(format!("Database error: {}", e)))
    }

    /// Fetch one license, enforcing reseller ownership
    pub async fn get_license(
        &self,
        license_id: i32,
        principal: &Principal,
    ) -> Result<license::Model, LicenseError> {
        let record = License::find_by_id(license_id)
            .one(&self.db)
            .await
            .map_err(|e| LicenseError::internal_error(format!("Database error: {}", e)))?
            .ok_or_else(LicenseError::license_not_found)?;

        Self::check_ownership(&record, principal)?;

        Ok(record)
    }

    /// Apply a validated update operation to a license
    pub async fn update_license(
        &self,
        license_id: i32,
        op: LicenseUpdateOp,
        principal: &Principal,
    ) -> Result<license::Model, LicenseError> {
        let record = self.get_license(license_id, principal).await?;

        let mut active: license::ActiveModel = record.clone().into();
        match op {
            LicenseUpdateOp::Set(flag, value) => match flag {
                LicenseFlag::Paused => active.paused = Set(value),
                LicenseFlag::Revoked => active.revoked = Set(value),
                LicenseFlag::Expired => active.expired = Set(value),
            },
            LicenseUpdateOp::Toggle(flag) => match flag {
                LicenseFlag::Paused => active.paused = Set(!record.paused),
                LicenseFlag::Revoked => active.revoked = Set(!record.revoked),
                LicenseFlag::Expired => active.expired = Set(!record.expired),
            },
            LicenseUpdateOp::ResetHwid => active.hwid = Set(None),
        }

        active
            .update(&self.db)
            .await
            .map_err(|e| LicenseError::internal_error(format!("Database error: {}", e)))
    }

    /// Delete a license. A reseller requester is refunded the unused
    /// whole days (ceiling) before the row is removed; admin deletions
    /// never refund. Refund and delete share one transaction.
    pub async fn delete_license(
        &self,
        license_id: i32,
        principal: &Principal,
    ) -> Result<(), LicenseError> {
        let record = self.get_license(license_id, principal).await?;

        let txn = self.db.begin().await.map_err(|e| {
            LicenseError::internal_error(format!("Failed to start transaction: {}", e))
        })?;

        if let (Principal::Reseller { id, .. }, Some(expires_at)) =
            (principal, record.expires_at)
        {
            let now = Utc::now().timestamp();
            if expires_at > now {
                let days_left =
                    ((expires_at - now + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY) as i32;
                if days_left > 0 {
                    ResellerStore::credit(&txn, *id, days_left)
                        .await
                        .map_err(|e| LicenseError::internal_error(format!("Database error: {}", e)))?;
                }
            }
        }

        License::delete_by_id(record.id)
            .exec(&txn)
            .await
            .map_err(|e| LicenseError::internal_error(format!("Database error: {}", e)))?;

        txn.commit().await.map_err(|e| {
            LicenseError::internal_error(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }

    /// Batch pause/unpause of every license owned by a reseller.
    /// One statement, all rows or none. Returns the affected count.
    pub async fn pause_all(&self, reseller_id: i32, pause: bool) -> Result<u64, LicenseError> {
        let result = License::update_many()
            .col_expr(license::Column::Paused, Expr::value(pause))
            .filter(license::Column::UserId.eq(reseller_id))
            .exec(&self.db)
            .await
            .map_err(|e| LicenseError::internal_error(format!("Database error: {}", e)))?;

        Ok(result.rows_affected)
    }

    fn check_ownership(record: &license::Model, principal: &Principal) -> Result<(), LicenseError> {
        if let Principal::Reseller { id, .. } = principal {
            if record.user_id != Some(*id) {
                return Err(LicenseError::forbidden());
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for LicenseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
